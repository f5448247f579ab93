//! Web server: static pages plus the feedback form.
//!
//! Configuration comes from CLI flags and the environment. The schema is
//! prepared eagerly at start-up and again, if that failed, before each
//! request.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod schema;
pub mod state;
pub mod static_files;

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;

use crate::logging::mask_email;
use crate::notify::{SmtpNotifier, SmtpSetup};

use config::{Cli, Config};
use error::ServerError;
use state::AppState;

/// Entry point: parse CLI, prepare the database, serve until shut down.
pub async fn run() -> Result<(), ServerError> {
    crate::logging::init();

    let cli = Cli::parse();
    let config = Config::from_cli_and_env(cli)?;

    tracing::info!("counsel-web starting");
    tracing::info!("  database: {}", config.db_path.display());

    let setup = SmtpSetup::from_config(&config.mail);
    match &setup {
        SmtpSetup::Configured(s) => tracing::info!(
            "  notifications: {}:{} -> {}",
            s.host,
            s.port,
            mask_email(&s.recipient)
        ),
        SmtpSetup::Unconfigured { missing } => tracing::info!(
            "  notifications: disabled (missing {})",
            missing.join(", ")
        ),
    }

    let state = AppState::new(config.db_path.clone(), Arc::new(SmtpNotifier::new(setup)));

    if !state.schema.ensure().await {
        tracing::warn!("  schema not ready; will retry on the next request");
    }

    let app = router::build_router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("counsel-web listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("counsel-web stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
