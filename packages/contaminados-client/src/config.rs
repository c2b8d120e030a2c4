use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::api_client::DEFAULT_TIMEOUT;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    // server URL to use when the session has none
    pub server: Option<String>,
    pub session_dir: PathBuf,
    // separate names keep separate sessions, like browser tabs
    pub session_name: String,
    pub poll_interval: Duration,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            session_dir: PathBuf::from(".contaminados"),
            session_name: "default".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            http_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let server = env::var("CONTAMINADOS_SERVER")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let session_dir = env::var("CONTAMINADOS_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_dir);
        let session_name = env::var("CONTAMINADOS_SESSION")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.session_name);
        let poll_interval = env::var("CONTAMINADOS_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);
        let http_timeout = env::var("CONTAMINADOS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.http_timeout);

        Self {
            server,
            session_dir,
            session_name,
            poll_interval,
            http_timeout,
        }
    }
}
