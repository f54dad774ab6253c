use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{impl_object, TypeMeta};
use crate::codec::{impl_codec, is_default, nullable};

/// Outcome of an operation as carried in `Status.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum StatusPhase {
    Success,
    Failure,
    /// The operation is still in progress.
    Working,
}

/// Machine readable description of why an operation is in the failure or
/// working state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum StatusReason {
    #[strum(serialize = "")]
    Unknown,
    #[strum(serialize = "StatusReasonWorking")]
    Working,
    NotFound,
    AlreadyExists,
    Conflict,
    Invalid,
}

impl StatusReason {
    /// HTTP status code suggested for this reason.
    pub fn http_code(&self) -> u16 {
        match self {
            StatusReason::Unknown => 500,
            StatusReason::Working => 202,
            StatusReason::NotFound => 404,
            StatusReason::AlreadyExists | StatusReason::Conflict => 409,
            StatusReason::Invalid => 422,
        }
    }
}

/// Machine readable description of the cause of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum CauseType {
    FieldValueNotFound,
    FieldValueRequired,
    FieldValueDuplicate,
    FieldValueInvalid,
    FieldValueNotSupported,
}

/// A single error behind a failed operation.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusCause {
    #[serde(
        rename = "reason",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub cause_type: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub message: String,
    /// Field of the resource that caused this error, e.g. `manifest.name`.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub field: String,
}

impl StatusCause {
    pub fn kind(&self) -> Option<CauseType> {
        self.cause_type.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StatusDetails {
    /// ID of the resource the status is about, if any.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub id: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub causes: Vec<StatusCause>,
}

/// Returned for calls that don't return other objects.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Status {
    #[serde(flatten)]
    pub meta: TypeMeta,
    /// One of "Success", "Failure" or "Working".
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub status: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub message: String,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StatusDetails>,
    /// Suggested HTTP return code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl Status {
    pub fn phase(&self) -> Option<StatusPhase> {
        self.status.parse().ok()
    }

    pub fn reason(&self) -> Option<StatusReason> {
        self.reason.parse().ok()
    }

    pub fn is_failure(&self) -> bool {
        self.phase() == Some(StatusPhase::Failure)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if !self.reason.is_empty() {
            write!(f, " ({})", self.reason)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl_codec!(StatusCause, StatusDetails, Status);
impl_object!(Status);
