//! Configuration types and constants for the web server.

use std::num::ParseIntError;
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::notify::{MailConfig, DEFAULT_FROM, DEFAULT_NOTIFY_EMAIL, DEFAULT_SMTP_PORT};
use crate::storage::db_path;

pub(crate) const DEFAULT_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {source}")]
    InvalidPort {
        key: &'static str,
        value: String,
        source: ParseIntError,
    },
}

/// Counseling website with a feedback form.
///
/// Configuration can be set via CLI arguments or environment variables.
/// CLI arguments take precedence over environment variables. SMTP settings
/// are read from the environment only.
#[derive(Parser, Debug, Default)]
#[command(name = "counsel-web", version, about)]
pub struct Cli {
    /// Host to bind [env: FLASK_RUN_HOST] [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on [env: PORT] [default: 5000]
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// SQLite database file [env: FEEDBACK_DB_PATH] [default: database.db]
    #[arg(long, short = 'd')]
    pub db: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub mail: MailConfig,
}

impl Config {
    pub fn from_cli_and_env(cli: Cli) -> Result<Self, ConfigError> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Merge CLI arguments with variables from `lookup`. Empty variables
    /// count as unset; whitespace-only ones are kept as given.
    pub fn resolve(
        cli: Cli,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = cli
            .host
            .or_else(|| var("FLASK_RUN_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match cli.port {
            Some(p) => p,
            None => parse_port("PORT", var("PORT"), DEFAULT_PORT)?,
        };

        let db = cli.db.or_else(|| var("FEEDBACK_DB_PATH").map(PathBuf::from));

        let username = var("SMTP_USER");
        let from = var("SMTP_FROM")
            .or_else(|| username.clone())
            .unwrap_or_else(|| DEFAULT_FROM.to_string());
        let recipient =
            var("FEEDBACK_NOTIFY_EMAIL").unwrap_or_else(|| DEFAULT_NOTIFY_EMAIL.to_string());

        let mail = MailConfig {
            host: var("SMTP_HOST"),
            port: parse_port("SMTP_PORT", var("SMTP_PORT"), DEFAULT_SMTP_PORT)?,
            username,
            password: var("SMTP_PASS"),
            from: Some(from),
            recipient: Some(recipient),
        };

        Ok(Self {
            host,
            port,
            db_path: db_path(db.as_deref()),
            mail,
        })
    }

    /// `host:port` for display, with IPv6 hosts bracketed.
    pub fn bind_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(key: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidPort { key, value: v, source }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::resolve(Cli::default(), env(&[])).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.db_path, PathBuf::from("database.db"));
        assert_eq!(cfg.mail.port, 587);
        assert_eq!(cfg.mail.host, None);
        assert_eq!(cfg.mail.from.as_deref(), Some("no-reply@localhost"));
        assert_eq!(cfg.mail.recipient.as_deref(), Some(DEFAULT_NOTIFY_EMAIL));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_environment_values() {
        let cfg = Config::resolve(
            Cli::default(),
            env(&[
                ("FLASK_RUN_HOST", "127.0.0.1"),
                ("PORT", "8080"),
                ("FEEDBACK_DB_PATH", "/tmp/site.db"),
                ("SMTP_HOST", "smtp.example.com"),
                ("SMTP_PORT", "2525"),
                ("SMTP_USER", "mailer@example.com"),
                ("SMTP_PASS", "secret"),
                ("FEEDBACK_NOTIFY_EMAIL", "owner@example.com"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/site.db"));
        assert_eq!(cfg.mail.host.as_deref(), Some("smtp.example.com"));
        assert_eq!(cfg.mail.port, 2525);
        assert_eq!(cfg.mail.from.as_deref(), Some("mailer@example.com"));
        assert_eq!(cfg.mail.recipient.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_smtp_from_overrides_user() {
        let cfg = Config::resolve(
            Cli::default(),
            env(&[("SMTP_USER", "mailer@example.com"), ("SMTP_FROM", "site@example.com")]),
        )
        .unwrap();
        assert_eq!(cfg.mail.from.as_deref(), Some("site@example.com"));
    }

    #[test]
    fn test_cli_overrides_environment() {
        let cli = Cli {
            host: Some("::1".to_string()),
            port: Some(9000),
            db: Some(PathBuf::from("cli.db")),
        };
        let cfg = Config::resolve(
            cli,
            env(&[("FLASK_RUN_HOST", "10.0.0.1"), ("PORT", "1"), ("FEEDBACK_DB_PATH", "env.db")]),
        )
        .unwrap();
        assert_eq!(cfg.bind_addr(), "[::1]:9000");
        assert_eq!(cfg.db_path, PathBuf::from("cli.db"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let cfg = Config::resolve(
            Cli::default(),
            env(&[("SMTP_HOST", ""), ("PORT", ""), ("FEEDBACK_NOTIFY_EMAIL", "")]),
        )
        .unwrap();
        assert_eq!(cfg.mail.host, None);
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.mail.recipient.as_deref(), Some(DEFAULT_NOTIFY_EMAIL));
    }

    #[test]
    fn test_whitespace_values_are_kept() {
        let cfg = Config::resolve(
            Cli::default(),
            env(&[("SMTP_PASS", "  "), ("FEEDBACK_NOTIFY_EMAIL", " ")]),
        )
        .unwrap();
        assert_eq!(cfg.mail.password.as_deref(), Some("  "));
        assert_eq!(cfg.mail.recipient.as_deref(), Some(" "));
        assert!(Config::resolve(Cli::default(), env(&[("PORT", "  ")])).is_err());
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let err = Config::resolve(Cli::default(), env(&[("SMTP_PORT", "smtp")])).unwrap_err();
        assert!(err.to_string().contains("SMTP_PORT"));
        assert!(Config::resolve(Cli::default(), env(&[("PORT", "70000")])).is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["counsel-web", "--host", "127.0.0.1", "-p", "8000", "-d", "x.db"]);
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.port, Some(8000));
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
    }
}
