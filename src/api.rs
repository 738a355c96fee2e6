// API client module: a small blocking HTTP client for the two Ameliorate
// tRPC procedures the uploader needs. Each call is a single POST with the
// payload wrapped in a `{"json": ...}` envelope and the session passed as a
// cookie. No retries; a failed call ends the run.

use crate::error::{PublishError, Result};
use crate::publish::{TopicHandle, TopicService};
use crate::request::Visibility;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE, COOKIE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Production tRPC endpoint prefix.
pub const DEFAULT_BASE_URL: &str = "https://ameliorate.app/api/trpc";
/// Cookie carrying the session credential.
pub const SESSION_COOKIE: &str = "appSession";
pub const CREATE_TOPIC: &str = "topic.create";
pub const UPDATE_DIAGRAM: &str = "topic.updateDiagram";
/// Where `topic.create` puts the new topic id in its response body.
pub const TOPIC_ID_PATH: &str = "result.data.json.id";

/// Fixed connection settings. Tests point `base_url` at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub session_cookie: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: SESSION_COOKIE.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        }
    }

    /// Full URL of a tRPC procedure.
    pub fn endpoint(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), procedure)
    }
}

/// The tRPC wrapper used for request bodies and for the innermost layer of
/// responses.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub json: T,
}

/// Topic fields as `topic.create` expects them.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopicDraft {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
    pub allow_anyone_to_edit: bool,
}

/// Body of `topic.create`. `quick_views` is required by the service and is
/// always sent empty.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub topic: TopicDraft,
    pub quick_views: Vec<Value>,
}

/// Body of `topic.updateDiagram`. Node and edge records are forwarded as-is.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiagramRequest {
    /// Echoes the id exactly as `topic.create` returned it.
    pub topic_id: Value,
    pub nodes_to_create: Vec<Value>,
    pub edges_to_create: Vec<Value>,
}

// `{"result": {"data": {"json": {"id": ...}}}}`, see TOPIC_ID_PATH.
#[derive(Deserialize, Debug)]
struct CreateTopicResponse {
    result: ResultData,
}

#[derive(Deserialize, Debug)]
struct ResultData {
    data: Envelope<CreatedTopic>,
}

#[derive(Deserialize, Debug)]
struct CreatedTopic {
    id: Value,
}

/// Blocking client for the topic service. Holds no session state; the
/// credential is supplied per call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client with reqwest's default transport settings.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(ApiClient::with_http_client(config, client))
    }

    pub fn with_http_client(config: ApiConfig, client: Client) -> Self {
        ApiClient { client, config }
    }

    /// Fixed request headers plus the session cookie.
    fn headers(&self, credential: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let cookie = format!("{}={}", self.config.session_cookie, credential);
        let mut cookie = HeaderValue::from_str(&cookie).map_err(|_| {
            PublishError::Validation("App session cookie contains characters not allowed in a header".into())
        })?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);
        Ok(headers)
    }

    /// POST one enveloped payload. Any non-2xx status becomes
    /// `PublishError::RemoteApi` with the body text attached.
    fn post<T: Serialize>(&self, procedure: &str, credential: &str, payload: &T) -> Result<Response> {
        let url = self.config.endpoint(procedure);
        let headers = self.headers(credential)?;
        debug!(%url, "sending request");
        let res = self
            .client
            .post(&url)
            .headers(headers)
            .json(&Envelope { json: payload })
            .send()?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res
                .text()
                .unwrap_or_else(|err| format!("<unreadable body: {}>", err));
            debug!(%url, %status, "request rejected");
            return Err(PublishError::RemoteApi { status, body });
        }
        Ok(res)
    }

    /// Call `topic.create` and pull the new id out of the response.
    pub fn create_topic(&self, credential: &str, request: &CreateTopicRequest) -> Result<TopicHandle> {
        let res = self.post(CREATE_TOPIC, credential, request)?;
        let body = res.text()?;
        let parsed: CreateTopicResponse = serde_json::from_str(&body).map_err(|err| {
            PublishError::Protocol(format!("{} response has no {}: {}", CREATE_TOPIC, TOPIC_ID_PATH, err))
        })?;
        let handle = TopicHandle::from_wire(parsed.result.data.json.id).ok_or_else(|| {
            PublishError::Protocol(format!(
                "{} response has no usable {} (expected a non-empty string or a number)",
                CREATE_TOPIC, TOPIC_ID_PATH
            ))
        })?;
        info!(topic_id = %handle.id(), "topic created");
        Ok(handle)
    }

    /// Call `topic.updateDiagram`. The response body is not read.
    pub fn update_diagram(&self, credential: &str, request: &UpdateDiagramRequest) -> Result<()> {
        self.post(UPDATE_DIAGRAM, credential, request)?;
        info!(
            nodes = request.nodes_to_create.len(),
            edges = request.edges_to_create.len(),
            "diagram uploaded"
        );
        Ok(())
    }
}

impl TopicService for ApiClient {
    fn create_topic(&self, credential: &str, request: &CreateTopicRequest) -> Result<TopicHandle> {
        ApiClient::create_topic(self, credential, request)
    }

    fn update_diagram(&self, credential: &str, request: &UpdateDiagramRequest) -> Result<()> {
        ApiClient::update_diagram(self, credential, request)
    }
}
