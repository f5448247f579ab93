//! Structured logging setup and log-line helpers.
//!
//! Installs a `tracing` subscriber that writes to stderr:
//!
//! ```text
//! 2026-10-19T09:14:03.120Z  INFO counsel_web::feedback: feedback stored from j***@example.com
//! ```
//!
//! Filtering follows `RUST_LOG` and defaults to `info`. ANSI colour is only
//! enabled when stderr is a terminal.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,tower_http=info";

static INIT: Once = Once::new();

/// Initialize the logging system. Safe to call more than once; only the
/// first call installs the subscriber.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Mask an email address for log output.
///
/// Keeps the first character of the local part and the whole domain, e.g.
/// `jane@example.com` becomes `j***@example.com`. Input without an `@` is
/// reduced to its first character.
pub fn mask_email(addr: &str) -> String {
    let addr = addr.trim();
    let first = addr.chars().next();
    match (first, addr.rsplit_once('@')) {
        (None, _) => String::new(),
        (Some(c), Some((_, domain))) => format!("{c}***@{domain}"),
        (Some(c), None) => format!("{c}***"),
    }
}
