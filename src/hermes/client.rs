//! HTTP client for the Hermes server API.
//!
//! Wraps one pooled `reqwest::Client` and attaches the bearer token to
//! every request. Cloning is cheap; all clones share the same pool.

use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use reqwest_eventsource::{Event, EventSource};
use serde::Serialize;
use tracing::debug;

use crate::common::error::{ApiError, ApiResult};
use crate::common::OutboundChatMessage;
use crate::config::HermesConfig;

/// Per-request timeout for one-shot calls. Event streams have none.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// TCP connect timeout for every request, streams included.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const PLAYER_COUNT_PATH: &str = "/players/count";
pub const PLAYER_NAMES_PATH: &str = "/players/names";
pub const CHAT_SEND_PATH: &str = "/chat/send";

/// Item produced by an event subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// The server accepted the subscription.
    Open,
    /// One event's data payload.
    Data(String),
}

/// Stream of subscription items. The first `Err` ends the subscription.
pub type FeedStream = BoxStream<'static, ApiResult<FeedEvent>>;

/// Source of server-sent-event subscriptions.
pub trait EventFeed: Send + Sync + 'static {
    /// Open a subscription to `path`. The connection is established when
    /// the returned stream is first polled.
    fn subscribe(&self, path: &str) -> ApiResult<FeedStream>;

    /// Absolute URL behind `path`, for error reports.
    fn endpoint(&self, path: &str) -> String;
}

/// Client for the Hermes REST and SSE endpoints.
#[derive(Debug, Clone)]
pub struct HermesClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HermesClient {
    /// Create a client with its own connection pool.
    pub fn new(config: &HermesConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|source| ApiError::Transport {
                url: config.base_url.clone(),
                source,
            })?;
        Ok(Self::with_http(http, config))
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_http(http: Client, config: &HermesConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_key {
            Some(ref key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// GET `path` and return the body. Anything but HTTP 200 is an error.
    pub async fn get_text(&self, path: &str) -> ApiResult<String> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .authorize(self.http.get(&url))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| ApiError::Transport { url, source })
    }

    /// POST a JSON body to `path`. Anything but HTTP 200 is an error.
    pub async fn post_json<T>(&self, path: &str, body: &T) -> ApiResult<()>
    where
        T: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self
            .authorize(self.http.post(&url))
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Number of players currently online.
    pub async fn player_count(&self) -> ApiResult<u32> {
        let body = self.get_text(PLAYER_COUNT_PATH).await?;
        body.trim().parse::<u32>().map_err(|e| ApiError::InvalidBody {
            url: self.url(PLAYER_COUNT_PATH),
            message: format!("'{}' is not a player count: {}", body.trim(), e),
        })
    }

    /// Names of players currently online. An empty body means nobody.
    pub async fn player_names(&self) -> ApiResult<Vec<String>> {
        let body = self.get_text(PLAYER_NAMES_PATH).await?;
        Ok(parse_player_names(&body))
    }

    /// Send a chat line into the game.
    pub async fn send_chat(&self, message: &OutboundChatMessage) -> ApiResult<()> {
        self.post_json(CHAT_SEND_PATH, message).await
    }
}

impl EventFeed for HermesClient {
    fn endpoint(&self, path: &str) -> String {
        self.url(path)
    }

    fn subscribe(&self, path: &str) -> ApiResult<FeedStream> {
        let url = self.url(path);
        let request = self
            .authorize(self.http.get(&url))
            .header(ACCEPT, "text/event-stream");

        let source = EventSource::new(request).map_err(|e| ApiError::InvalidRequest {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let stream = source.map(move |event| match event {
            Ok(Event::Open) => Ok(FeedEvent::Open),
            Ok(Event::Message(message)) => Ok(FeedEvent::Data(message.data)),
            Err(e) => Err(stream_error(&url, e)),
        });

        Ok(stream.boxed())
    }
}

fn stream_error(url: &str, error: reqwest_eventsource::Error) -> ApiError {
    use reqwest_eventsource::Error;

    let url = url.to_string();
    match error {
        Error::Transport(source) => ApiError::Transport { url, source },
        Error::InvalidStatusCode(status, _) => ApiError::Status {
            url,
            status: status.as_u16(),
        },
        Error::StreamEnded => ApiError::StreamEnded { url },
        other => ApiError::Stream {
            url,
            message: other.to_string(),
        },
    }
}

/// Split the comma-separated names body, dropping blank entries.
pub fn parse_player_names(body: &str) -> Vec<String> {
    body.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hermes::testing::FakeHermes;
    use tokio_test::{assert_err, assert_ok};

    fn client_for(base_url: &str, api_key: Option<&str>) -> HermesClient {
        HermesClient::new(&HermesConfig {
            base_url: base_url.to_string(),
            api_key: api_key.map(String::from),
        })
        .unwrap()
    }

    #[test]
    fn test_parse_player_names() {
        assert_eq!(parse_player_names("Steve, Alex"), vec!["Steve", "Alex"]);
        assert_eq!(parse_player_names("Steve"), vec!["Steve"]);
        assert!(parse_player_names("").is_empty());
        assert!(parse_player_names("  \n").is_empty());
        assert_eq!(parse_player_names("a,,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = client_for("http://localhost:8080/", None);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/chat/send"), "http://localhost:8080/chat/send");
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let fake = FakeHermes::new().player_count(200, "3").spawn().await;
        let client = client_for(&fake.base_url, Some("secret"));

        assert_eq!(client.player_count().await.unwrap(), 3);
        assert_eq!(fake.auth_headers(), vec![Some("Bearer secret".to_string())]);
    }

    #[tokio::test]
    async fn test_no_token_omits_header() {
        let fake = FakeHermes::new().player_count(200, "0").spawn().await;
        let client = client_for(&fake.base_url, Some(""));

        assert_ok!(client.player_count().await);
        assert_eq!(fake.auth_headers(), vec![None]);
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let fake = FakeHermes::new().player_count(503, "").spawn().await;
        let client = client_for(&fake.base_url, None);

        let err = client.player_count().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_garbage_count_is_invalid_body() {
        let fake = FakeHermes::new().player_count(200, "lots").spawn().await;
        let client = client_for(&fake.base_url, None);

        let err = client.player_count().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody { .. }));
    }

    #[tokio::test]
    async fn test_player_names_empty_body() {
        let fake = FakeHermes::new().player_names(200, "").spawn().await;
        let client = client_for(&fake.base_url, None);

        assert!(client.player_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_chat_posts_json() {
        let fake = FakeHermes::new().chat_send(200).spawn().await;
        let client = client_for(&fake.base_url, None);

        let message = OutboundChatMessage::from_discord("Bob", "gg");
        assert_ok!(client.send_chat(&message).await);
        assert_eq!(
            fake.sent_chat(),
            vec![serde_json::json!({"sender": "[Discord] Bob", "message": "gg"})]
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let client = client_for("http://127.0.0.1:1", None);
        let err = client.get_text(PLAYER_COUNT_PATH).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_subscribe_yields_open_then_data() {
        let fake = FakeHermes::new()
            .chat_events(["Alex: hi", "{\"player\":\"Steve\",\"message\":\"yo\"}"])
            .spawn()
            .await;
        let client = client_for(&fake.base_url, Some("secret"));

        let mut stream = client.subscribe("/chat/stream").unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), FeedEvent::Open);
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            FeedEvent::Data("Alex: hi".to_string())
        );
        assert_eq!(
            stream.next().await.unwrap().unwrap(),
            FeedEvent::Data("{\"player\":\"Steve\",\"message\":\"yo\"}".to_string())
        );
        assert_eq!(fake.auth_headers(), vec![Some("Bearer secret".to_string())]);
    }

    #[tokio::test]
    async fn test_subscribe_rejected_stream() {
        let fake = FakeHermes::new().stream_status(401).spawn().await;
        let client = client_for(&fake.base_url, None);

        let mut stream = client.subscribe("/players/connections").unwrap();
        let err = assert_err!(stream.next().await.unwrap());
        assert_eq!(err.status(), Some(401));
    }
}
