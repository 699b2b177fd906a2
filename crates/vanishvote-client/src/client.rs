use crate::ApiError;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use url::Url;
use vanishvote_models::{
    AddCommentRequest, AddReactionRequest, CreatePollRequest, Poll, ReactionKind, VoteRequest,
};

pub const DEFAULT_BASE_URL: &str = "https://vanishvote.na-api-bundle.cyou/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The five calls the poll views make against the VanishVote API.
///
/// `ApiClient` is the HTTP implementation; anything else implementing this
/// trait (in-memory fakes in tests) can drive the same views.
pub trait PollApi: Send + Sync {
    fn create_poll(
        &self,
        request: &CreatePollRequest,
    ) -> impl Future<Output = Result<Poll, ApiError>> + Send;

    fn get_poll(&self, poll_id: &str) -> impl Future<Output = Result<Poll, ApiError>> + Send;

    fn vote(
        &self,
        poll_id: &str,
        option_index: usize,
    ) -> impl Future<Output = Result<Poll, ApiError>> + Send;

    fn add_comment(
        &self,
        poll_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<Poll, ApiError>> + Send;

    fn add_reaction(
        &self,
        poll_id: &str,
        kind: ReactionKind,
    ) -> impl Future<Output = Result<Poll, ApiError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the VanishVote REST API.
///
/// Every call is a single request: no caching, no retry, no idempotency keys.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("vanishvote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/seg/seg/...`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `{base}/polls/{id}` plus an optional action segment.
    fn poll_endpoint(&self, poll_id: &str, action: Option<&str>) -> Result<Url, ApiError> {
        if matches!(poll_id.trim(), "" | "." | "..") {
            return Err(ApiError::InvalidPollId(poll_id.to_string()));
        }
        let mut segments = vec!["polls", poll_id];
        segments.extend(action);
        Ok(self.endpoint(&segments))
    }

    async fn get(&self, url: Url) -> Result<Poll, ApiError> {
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        read_poll(resp, &url).await
    }

    async fn post<B: Serialize + Sync>(&self, url: Url, body: &B) -> Result<Poll, ApiError> {
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        read_poll(resp, &url).await
    }
}

impl PollApi for ApiClient {
    async fn create_poll(&self, request: &CreatePollRequest) -> Result<Poll, ApiError> {
        self.post(self.endpoint(&["polls"]), request).await
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Poll, ApiError> {
        self.get(self.poll_endpoint(poll_id, None)?).await
    }

    async fn vote(&self, poll_id: &str, option_index: usize) -> Result<Poll, ApiError> {
        self.post(
            self.poll_endpoint(poll_id, Some("vote"))?,
            &VoteRequest { option_index },
        )
        .await
    }

    async fn add_comment(&self, poll_id: &str, text: &str) -> Result<Poll, ApiError> {
        self.post(
            self.poll_endpoint(poll_id, Some("comments"))?,
            &AddCommentRequest {
                text: text.to_string(),
            },
        )
        .await
    }

    async fn add_reaction(&self, poll_id: &str, kind: ReactionKind) -> Result<Poll, ApiError> {
        self.post(
            self.poll_endpoint(poll_id, Some("reactions"))?,
            &AddReactionRequest { kind },
        )
        .await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let parsed =
        Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::InvalidBaseUrl(format!(
            "only http:// and https:// are supported, got scheme '{}'",
            parsed.scheme()
        )));
    }
    if parsed.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(parsed)
}

fn transport_error(url: &Url, err: reqwest::Error) -> ApiError {
    tracing::warn!(%url, "request failed: {err}");
    ApiError::Http(err.to_string())
}

async fn read_poll(resp: reqwest::Response, url: &Url) -> Result<Poll, ApiError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        tracing::debug!(%url, %status, "poll missing or expired");
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        tracing::warn!(%url, %status, "request rejected");
        return Err(ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    resp.json::<Poll>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
