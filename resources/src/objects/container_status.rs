use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::Time;
use crate::codec::{first_match, impl_codec, is_default, nullable, one_of};

/// Status of a pod as reported in `PodState.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum PodStatus {
    /// Waiting for the pod to begin running.
    Waiting,
    /// The pod is up and running.
    Running,
    /// The pod has stopped.
    Terminated,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ContainerStateWaiting {
    /// Reason could be pulling image.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStateRunning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Time>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStateTerminated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i64>,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Time>,
}

one_of! {
    /// Possible states of a container.
    pub enum ContainerState {
        "waiting" => Waiting(ContainerStateWaiting),
        "running" => Running(ContainerStateRunning),
        "termination" => Terminated(ContainerStateTerminated),
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerStatus {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "first_match")]
    pub state: Option<ContainerState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_count: Option<i64>,
    /// The IP of the pod the container runs in.
    #[serde(
        rename = "podIP",
        skip_serializing_if = "is_default",
        deserialize_with = "nullable"
    )]
    pub pod_ip: String,
    /// Image the container is running.
    #[serde(skip_serializing_if = "is_default", deserialize_with = "nullable")]
    pub image: String,
}

impl ContainerStatus {
    pub fn is_running(&self) -> bool {
        matches!(self.state, Some(ContainerState::Running(_)))
    }
}

impl_codec!(
    ContainerStateWaiting,
    ContainerStateRunning,
    ContainerStateTerminated,
    ContainerStatus,
);

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use super::*;
    use crate::codec::Codec;

    #[test]
    fn state_branches() {
        let status = ContainerStatus::decode(&json!({
            "state": {"running": {"startedAt": "2014-10-21T15:00:00Z"}},
            "restartCount": 2,
            "podIP": "10.244.1.4",
            "image": "redis",
        }))
        .unwrap();
        assert!(status.is_running());
        match &status.state {
            Some(ContainerState::Running(running)) => {
                assert_eq!(
                    running.started_at,
                    Utc.with_ymd_and_hms(2014, 10, 21, 15, 0, 0).single().map(Time::from)
                )
            },
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(status.restart_count, Some(2));
        assert_eq!(status.pod_ip, "10.244.1.4");
    }

    #[test]
    fn terminated_state() {
        let raw = json!({"termination": {
            "exitCode": 0,
            "reason": "Completed",
            "finishedAt": "2014-10-21T16:00:00Z",
        }});
        let status = ContainerStatus::decode(&json!({"state": raw.clone()})).unwrap();
        match &status.state {
            Some(ContainerState::Terminated(terminated)) => {
                assert_eq!(terminated.exit_code, Some(0));
                assert_eq!(terminated.signal, None);
            },
            other => panic!("unexpected state {:?}", other),
        }
        assert_eq!(status.encode().get("state"), Some(&raw));
    }

    #[test]
    fn waiting_takes_precedence() {
        let status = ContainerStatus::decode(&json!({"state": {
            "termination": {"exitCode": 1},
            "waiting": {"reason": "pulling image"},
        }}))
        .unwrap();
        assert_eq!(
            status.state,
            Some(ContainerState::Waiting(ContainerStateWaiting {
                reason: "pulling image".to_string()
            }))
        );
    }

    #[test]
    fn no_recognised_state() {
        let status = ContainerStatus::decode(&json!({"state": {"paused": {}}})).unwrap();
        assert_eq!(status, ContainerStatus::default());
        assert_eq!(Value::Object(status.encode()), json!({}));
    }

    #[test]
    fn pod_status_names() {
        assert_eq!("Running".parse::<PodStatus>().unwrap(), PodStatus::Running);
        assert!("Pending".parse::<PodStatus>().is_err());
        assert_eq!(PodStatus::Terminated.as_ref(), "Terminated");
    }
}
