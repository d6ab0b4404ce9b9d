//! In-process stand-in for the Hermes API, used by tests.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, StreamExt};

#[derive(Debug, Default)]
struct Recorded {
    auth_headers: Vec<Option<String>>,
    sent_chat: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct Routes {
    count: (u16, String),
    names: (u16, String),
    send_status: u16,
    stream_status: u16,
    chat_events: Vec<String>,
    presence_events: Vec<String>,
}

#[derive(Clone)]
struct FakeState {
    routes: Arc<Routes>,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeState {
    fn record_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.recorded.lock().unwrap().auth_headers.push(auth);
    }
}

/// Builder for a fake Hermes server.
pub struct FakeHermes {
    routes: Routes,
}

impl FakeHermes {
    pub fn new() -> Self {
        Self {
            routes: Routes {
                count: (200, "0".to_string()),
                names: (200, String::new()),
                send_status: 200,
                stream_status: 200,
                chat_events: Vec::new(),
                presence_events: Vec::new(),
            },
        }
    }

    pub fn player_count(mut self, status: u16, body: &str) -> Self {
        self.routes.count = (status, body.to_string());
        self
    }

    pub fn player_names(mut self, status: u16, body: &str) -> Self {
        self.routes.names = (status, body.to_string());
        self
    }

    pub fn chat_send(mut self, status: u16) -> Self {
        self.routes.send_status = status;
        self
    }

    pub fn stream_status(mut self, status: u16) -> Self {
        self.routes.stream_status = status;
        self
    }

    pub fn chat_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes.chat_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn presence_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes.presence_events = events.into_iter().map(Into::into).collect();
        self
    }

    /// Bind to an ephemeral local port and serve in the background.
    pub async fn spawn(self) -> RunningHermes {
        let state = FakeState {
            routes: Arc::new(self.routes),
            recorded: Arc::new(Mutex::new(Recorded::default())),
        };

        let app = Router::new()
            .route("/players/count", get(player_count))
            .route("/players/names", get(player_names))
            .route("/players/connections", get(presence_stream))
            .route("/chat/stream", get(chat_stream))
            .route("/chat/send", post(chat_send))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningHermes {
            base_url: format!("http://{}", addr),
            recorded: state.recorded,
        }
    }
}

/// Handle to a running fake server.
pub struct RunningHermes {
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl RunningHermes {
    /// `Authorization` header of every request, in arrival order.
    pub fn auth_headers(&self) -> Vec<Option<String>> {
        self.recorded.lock().unwrap().auth_headers.clone()
    }

    /// Bodies received on `POST /chat/send`.
    pub fn sent_chat(&self) -> Vec<serde_json::Value> {
        self.recorded.lock().unwrap().sent_chat.clone()
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn player_count(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.record_auth(&headers);
    let (code, body) = state.routes.count.clone();
    (status(code), body).into_response()
}

async fn player_names(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.record_auth(&headers);
    let (code, body) = state.routes.names.clone();
    (status(code), body).into_response()
}

async fn chat_send(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    state.record_auth(&headers);
    state.recorded.lock().unwrap().sent_chat.push(body);
    status(state.routes.send_status)
}

async fn chat_stream(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.record_auth(&headers);
    event_stream(state.routes.stream_status, state.routes.chat_events.clone())
}

async fn presence_stream(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.record_auth(&headers);
    event_stream(state.routes.stream_status, state.routes.presence_events.clone())
}

/// Serve `events` and then hold the connection open.
fn event_stream(code: u16, events: Vec<String>) -> Response {
    if code != 200 {
        return status(code).into_response();
    }
    let events = stream::iter(
        events
            .into_iter()
            .map(|data| Ok::<_, Infallible>(Event::default().data(data))),
    )
    .chain(stream::pending());
    Sse::new(events).into_response()
}
