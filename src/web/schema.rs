//! Process-wide, run-once schema initialization.
//!
//! The guard latches only on success. A failed attempt is logged and left
//! for the next request to retry; concurrent first requests share a single
//! attempt.

use std::path::PathBuf;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::OnceCell;

use crate::storage::{SchemaReport, Storage};
use crate::web::error::InitError;
use crate::web::state::SharedState;

pub struct SchemaGuard {
    db_path: PathBuf,
    ready: OnceCell<SchemaReport>,
}

impl SchemaGuard {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            ready: OnceCell::new(),
        }
    }

    /// Ensure the schema exists. Returns whether it is ready; errors are
    /// logged, never returned.
    pub async fn ensure(&self) -> bool {
        let result = self
            .ready
            .get_or_try_init(|| {
                let path = self.db_path.clone();
                async move {
                    let report = tokio::task::spawn_blocking(move || {
                        Storage::open(&path)?.ensure_schema()
                    })
                    .await??;
                    if report.is_noop() {
                        tracing::info!("schema ready (version {})", report.to_version);
                    } else {
                        tracing::info!(
                            "schema migrated v{} -> v{} (created_at added: {}, backfilled: {})",
                            report.from_version,
                            report.to_version,
                            report.added_created_at,
                            report.backfilled_rows
                        );
                    }
                    Ok::<_, InitError>(report)
                }
            })
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("db init error: {e}");
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// What the successful initialization changed, if it has happened.
    pub fn report(&self) -> Option<&SchemaReport> {
        self.ready.get()
    }
}

/// Middleware that makes sure the schema exists before any handler runs.
pub async fn ensure_schema_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    state.schema.ensure().await;
    next.run(request).await
}
