//! Error types for request handling and server start-up.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::storage::StorageError;
use crate::web::config::ConfigError;
use crate::web::pages::{render, Page};

/// Failures that end a request with a generic server error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render(Page::ServerError)),
        )
            .into_response()
    }
}

/// Schema initialization failure; logged by the guard and never shown to
/// visitors.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("schema task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Fatal start-up errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(std::io::Error),
}
