use std::path::PathBuf;

use anyhow::{Context, Result};

/// Placeholder secret shipped for local development.
pub const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    pub session_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_uri = lookup("DB_URI").unwrap_or_else(|| "sqlite:///tasks.db".into());
        let secret_key = lookup("TASKBOARD_SECRET_KEY").unwrap_or_else(|| PLACEHOLDER_SECRET.into());
        let host = lookup("TASKBOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("TASKBOARD_PORT")
            .unwrap_or_else(|| "5000".into())
            .parse()
            .context("TASKBOARD_PORT must be a port number")?;
        let session_days: i64 = lookup("TASKBOARD_SESSION_DAYS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .context("TASKBOARD_SESSION_DAYS must be a whole number of days")?;
        if session_days <= 0 {
            anyhow::bail!("TASKBOARD_SESSION_DAYS must be positive, got {}", session_days);
        }

        Ok(Self {
            db_path: db_path_from_uri(&db_uri),
            secret_key,
            host,
            port,
            session_days,
        })
    }

    /// Host and port for `TcpListener::bind`; the host may be an IP literal or a hostname.
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key.is_empty() || self.secret_key == PLACEHOLDER_SECRET
    }
}

/// `sqlite:///tasks.db` and `sqlite://tasks.db` both name the file `tasks.db`;
/// `sqlite:////var/lib/tasks.db` is absolute. Anything else is taken as a path.
fn db_path_from_uri(uri: &str) -> PathBuf {
    let path = uri
        .strip_prefix("sqlite:///")
        .or_else(|| uri.strip_prefix("sqlite://"))
        .unwrap_or(uri);
    PathBuf::from(path)
}
