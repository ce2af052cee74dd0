//! Shared test infrastructure for integration tests.
//!
//! `CannedServer` is an `axum` app on localhost that answers every request
//! with the next scripted reply and records what was sent, so tests can
//! assert on the wire traffic. It runs on its own tokio runtime in a
//! background thread; the binary under test stays synchronous.

use std::collections::VecDeque;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::sync::oneshot;

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct CannedReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl CannedReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: body.to_string(),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).expect("valid canned status");
        match self.content_type {
            Some(content_type) => {
                (status, [(header::CONTENT_TYPE, content_type)], self.body).into_response()
            }
            None => (status, self.body).into_response(),
        }
    }
}

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

struct Script {
    replies: VecDeque<CannedReply>,
    recorded: Vec<RecordedRequest>,
}

type SharedScript = Arc<Mutex<Script>>;

pub struct CannedServer {
    listener: TcpListener,
    addr: SocketAddr,
}

pub struct RunningServer {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl CannedServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind canned server");
        let addr = listener.local_addr().expect("local addr");
        Self { listener, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Serve `replies` in order on a background thread. Requests past the
    /// end of the script get a 500.
    pub fn serve(self, replies: Vec<CannedReply>) -> RunningServer {
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let listener = self.listener;
        listener
            .set_nonblocking(true)
            .expect("nonblocking listener");

        let handle = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("build test runtime");
            runtime.block_on(async move {
                let script: SharedScript = Arc::new(Mutex::new(Script {
                    replies: replies.into(),
                    recorded: Vec::new(),
                }));
                let app = Router::new()
                    .fallback(answer)
                    .with_state(Arc::clone(&script));
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .expect("canned server");

                let mut script = script.lock().expect("script lock");
                std::mem::take(&mut script.recorded)
            })
        });
        RunningServer { shutdown, handle }
    }
}

impl RunningServer {
    /// Stop the server and return every recorded request.
    pub fn finish(self) -> Vec<RecordedRequest> {
        let _ = self.shutdown.send(());
        self.handle.join().expect("canned server thread")
    }
}

async fn answer(
    State(script): State<SharedScript>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().expect("ascii header value");
            (name.as_str().to_string(), value.to_string())
        })
        .collect();

    let mut script = script.lock().expect("script lock");
    script.recorded.push(RecordedRequest {
        method: method.to_string(),
        target,
        headers,
        body: body.to_vec(),
    });
    match script.replies.pop_front() {
        Some(reply) => reply.into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no canned reply left").into_response(),
    }
}

pub fn capgen() -> std::process::Command {
    let mut command = std::process::Command::new(env!("CARGO_BIN_EXE_capgen"));
    command
        .env_remove("CAPGEN_ACCESS_TOKEN")
        .env_remove("CAPGEN_API_BASE_URL")
        .env_remove("RUST_LOG");
    command
}
