//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;

use counsel_web::notify::Notifier;
use counsel_web::web::router::build_router;
use counsel_web::web::state::{AppState, SharedState};

/// Notifier that always reports the same result and counts calls.
pub struct FixedNotifier {
    result: bool,
    calls: AtomicUsize,
}

impl FixedNotifier {
    pub fn new(result: bool) -> Arc<Self> {
        Arc::new(Self {
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Notifier for FixedNotifier {
    fn send_feedback_email(&self, _name: &str, _email: &str, _message: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }

    fn is_configured(&self) -> bool {
        self.result
    }
}

pub async fn start_server(state: SharedState) -> (String, oneshot::Sender<()>) {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind server");
    let addr = listener.local_addr().expect("server addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });
    tokio::spawn(async move {
        let _ = server.await;
    });

    (format!("http://{}", addr), shutdown_tx)
}

pub async fn start_with(
    db_path: &Path,
    notifier: Arc<dyn Notifier>,
) -> (String, SharedState, oneshot::Sender<()>) {
    let state = AppState::new(db_path.to_path_buf(), notifier);
    let (base_url, shutdown_tx) = start_server(Arc::clone(&state)).await;
    (base_url, state, shutdown_tx)
}

pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

fn into_reply(result: Result<ureq::Response, ureq::Error>) -> Reply {
    let response = match result {
        Ok(r) => r,
        Err(ureq::Error::Status(_, r)) => r,
        Err(e) => panic!("request failed: {e}"),
    };
    let status = response.status();
    let content_type = response.content_type().to_string();
    let body = response.into_string().expect("response body");
    Reply {
        status,
        content_type,
        body,
    }
}

/// Blocking GET; run inside `spawn_blocking`.
pub fn get(url: &str) -> Reply {
    into_reply(ureq::get(url).call())
}

/// Blocking urlencoded POST; run inside `spawn_blocking`.
pub fn post_form(url: &str, fields: &[(&str, &str)]) -> Reply {
    into_reply(ureq::post(url).send_form(fields))
}

pub async fn get_async(url: String) -> Reply {
    tokio::task::spawn_blocking(move || get(&url))
        .await
        .expect("get task")
}

pub async fn post_form_async(url: String, fields: Vec<(&'static str, &'static str)>) -> Reply {
    tokio::task::spawn_blocking(move || post_form(&url, &fields))
        .await
        .expect("post task")
}

/// Rows in the `users` table as `(name, email, message, created_at)`.
pub fn read_rows(db_path: &Path) -> Vec<(String, String, String, Option<String>)> {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    let mut stmt = conn
        .prepare("SELECT name, email, message, created_at FROM users ORDER BY rowid")
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
        .expect("query");
    rows.map(|r| r.expect("row")).collect()
}
