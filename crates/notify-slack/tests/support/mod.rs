//! In-process stand-in for the Slack Web API.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// One API call as the stub saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    reply: Value,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

/// Answers every `POST /api/{method}` with the same JSON reply.
pub struct StubSlack {
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn handle(
    State(state): State<StubState>,
    Path(method): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(Recorded {
        method,
        authorization,
        body,
    });
    Json(state.reply.clone())
}

impl StubSlack {
    /// Serve on an ephemeral port from a background thread, so both
    /// async tests and blocking binary tests can talk to it.
    pub fn start(reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            requests: requests.clone(),
        };
        let (tx, rx) = mpsc::channel::<SocketAddr>();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                let app = Router::new()
                    .route("/api/{method}", post(handle))
                    .with_state(state);
                axum::serve(listener, app).await.unwrap();
            });
        });

        let addr = rx.recv().unwrap();
        Self {
            url: format!("http://{addr}/api"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}
