//! Blocking HTTP client for the v1beta2 API.

mod cache;

use std::{net::IpAddr, sync::Arc, time::Duration};

use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode, Url,
};
use serde_json::{Map, Value};

pub use self::cache::{MemoryCache, ResponseCache};
use crate::{
    codec::{Codec, DecodeError},
    config::ClusterConfig,
    objects::{
        binding::Binding,
        event::EventList,
        node::MinionList,
        pod::{Pod, PodList},
        replication_controller::ReplicationControllerList,
        service::{EndpointsList, ServiceList},
        status::{Status, StatusPhase},
        KubeObject, Object, API_VERSION,
    },
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no credentials set")]
    MissingCredentials,
    #[error("request failed")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("server returned {0}")]
    Status(Box<Status>),
    #[error("invalid url {0}")]
    InvalidUrl(String),
    #[error("invalid request header {0}")]
    InvalidHeader(String),
}

/// Basic auth user id and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user_id: String,
    password: String,
}

impl Credentials {
    /// `None` unless both the user id and the password are non-empty.
    pub fn new(user_id: &str, password: &str) -> Option<Self> {
        if user_id.is_empty() || password.is_empty() {
            return None;
        }
        Some(Credentials {
            user_id: user_id.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("password", &"***")
            .finish()
    }
}

/// Handle to one API server. Requests use the credentials held at call time.
pub struct Api {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl Api {
    pub fn new(config: &ClusterConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_owned();
        let parsed = Url::parse(&base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {}", base_url, err)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.request_headers.iter() {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.to_owned()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(name.to_owned()))?;
            headers.insert(header, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout.map(Duration::from_secs))
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify);
        if is_loopback(&parsed) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Api {
            base_url,
            client,
            credentials: None,
            cache: None,
        })
    }

    /// Serve GET requests from `cache` when it has the URL, and fill it
    /// with successful GET responses. A successful POST, PUT or DELETE
    /// evicts its own URL and the URL of the collection it belongs to.
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    pub fn clear_credentials(&mut self) {
        self.credentials = None;
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&url).map_err(|err| ApiError::InvalidUrl(format!("{}: {}", url, err)))
    }

    pub fn get<T: Codec>(&self, path: &str) -> Result<T, ApiError> {
        let raw = self.request(Method::GET, path, None)?;
        Ok(T::decode(&raw)?)
    }

    pub fn post<B: Object, T: Codec>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let raw = self.request(Method::POST, path, Some(envelope(body)))?;
        Ok(T::decode(&raw)?)
    }

    pub fn put<B: Object, T: Codec>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let raw = self.request(Method::PUT, path, Some(envelope(body)))?;
        Ok(T::decode(&raw)?)
    }

    pub fn delete<T: Codec>(&self, path: &str) -> Result<T, ApiError> {
        let raw = self.request(Method::DELETE, path, None)?;
        Ok(T::decode(&raw)?)
    }

    pub fn get_pods(&self) -> Result<PodList, ApiError> {
        self.get("pods")
    }

    pub fn get_pod(&self, id: &str) -> Result<Pod, ApiError> {
        self.get(&format!("pods/{}", id))
    }

    pub fn get_replication_controllers(&self) -> Result<ReplicationControllerList, ApiError> {
        self.get("replicationControllers")
    }

    pub fn get_services(&self) -> Result<ServiceList, ApiError> {
        self.get("services")
    }

    pub fn get_endpoints(&self) -> Result<EndpointsList, ApiError> {
        self.get("endpoints")
    }

    pub fn get_minions(&self) -> Result<MinionList, ApiError> {
        self.get("minions")
    }

    pub fn get_events(&self) -> Result<EventList, ApiError> {
        self.get("events")
    }

    pub fn create_pod(&self, pod: &Pod) -> Result<Pod, ApiError> {
        self.post("pods", pod)
    }

    pub fn update_pod(&self, pod: &Pod) -> Result<Pod, ApiError> {
        self.put(&format!("pods/{}", pod.meta.id), pod)
    }

    pub fn delete_pod(&self, id: &str) -> Result<Status, ApiError> {
        self.delete(&format!("pods/{}", id))
    }

    pub fn create_binding(&self, binding: &Binding) -> Result<Status, ApiError> {
        self.post("bindings", binding)
    }

    /// POST any object to the collection of its kind.
    pub fn create(&self, object: &KubeObject) -> Result<KubeObject, ApiError> {
        let path = object
            .resource()
            .ok_or_else(|| ApiError::InvalidUrl(format!("cannot create a {}", object.kind())))?;
        let mut body = object.encode();
        stamp(&mut body, object.kind());
        let mut raw = self.request(Method::POST, path, Some(body))?;
        if let Value::Object(map) = &mut raw {
            map.entry("kind")
                .or_insert_with(|| Value::String(object.kind().to_owned()));
        }
        Ok(KubeObject::decode(&raw)?)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Map<String, Value>>,
    ) -> Result<Value, ApiError> {
        let credentials = self.credentials.as_ref().ok_or(ApiError::MissingCredentials)?;
        let url = self.url(path)?;
        let cache = self.cache.as_ref().filter(|_| method == Method::GET);
        if let Some(text) = cache.and_then(|cache| cache.get(url.as_str())) {
            tracing::debug!("{} {} served from cache", method, url);
            return parse_body(&text);
        }

        tracing::debug!("{} {}", method, url);
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .basic_auth(credentials.user_id(), Some(credentials.password()));
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send()?;
        let code = response.status();
        let text = response.text()?;
        tracing::debug!("{} {} returned {}", method, url, code);

        let raw = match parse_body(&text) {
            Err(ApiError::Decode(_)) if !code.is_success() => return Err(http_failure(code, &text)),
            Ok(_) if !code.is_success() => return Err(http_failure(code, &text)),
            result => result?,
        };
        match &self.cache {
            Some(cache) if method == Method::GET => cache.set(url.as_str(), &text),
            Some(cache) => {
                cache.remove(url.as_str());
                cache.remove(self.collection_url(path)?.as_str());
            },
            None => {},
        }
        Ok(raw)
    }

    /// `pods` for `pods/web`.
    fn collection_url(&self, path: &str) -> Result<Url, ApiError> {
        let path = path.trim_start_matches('/');
        self.url(path.split('/').next().unwrap_or(path))
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_or(false, |ip| ip.is_loopback()),
        None => false,
    }
}

/// Fill in `kind` and `apiVersion` when the object leaves them empty.
fn stamp(body: &mut Map<String, Value>, kind: &str) {
    body.entry("kind")
        .or_insert_with(|| Value::String(kind.to_owned()));
    body.entry("apiVersion")
        .or_insert_with(|| Value::String(API_VERSION.to_owned()));
}

fn envelope<B: Object>(body: &B) -> Map<String, Value> {
    let mut map = body.encode();
    stamp(&mut map, B::KIND);
    map
}

/// Parse a response body, turning a `Status` of `Failure` into an error.
fn parse_body(text: &str) -> Result<Value, ApiError> {
    let raw: Value = serde_json::from_str(text).map_err(|source| DecodeError::Parse {
        text: text.to_owned(),
        source,
    })?;
    if raw.get("kind").and_then(Value::as_str) == Some(Status::KIND) {
        let status = Status::decode(&raw)?;
        if status.is_failure() {
            return Err(ApiError::Status(Box::new(status)));
        }
    }
    Ok(raw)
}

/// A failed HTTP exchange whose body is not a `Status` object.
fn http_failure(code: StatusCode, text: &str) -> ApiError {
    let message = match text.trim() {
        "" => code.canonical_reason().unwrap_or_default().to_owned(),
        text => text.to_owned(),
    };
    ApiError::Status(Box::new(Status {
        status: StatusPhase::Failure.to_string(),
        message,
        code: Some(i64::from(code.as_u16())),
        ..Status::default()
    }))
}
