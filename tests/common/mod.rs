//! A throwaway axum server for driving the reqwest clients in tests.
//!
//! Every request, whatever its route, is recorded and answered with the next
//! canned reply. Once the replies run out the server answers 500.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query as sent on the request line.
    pub target: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct Shared {
    replies: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockServer {
    pub url: String,
    shared: Arc<Shared>,
}

impl MockServer {
    /// Start serving `replies` in order; each entry is `(status, json body)`.
    pub async fn start(replies: Vec<(u16, String)>) -> Self {
        let shared = Arc::new(Shared {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, shared }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|p| p.to_string())
        .unwrap_or_else(|| uri.path().to_string());

    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        target,
        headers,
        body,
    });

    let (status, body) = shared
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((500, r#"{"error":{"message":"no reply queued"}}"#.to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
