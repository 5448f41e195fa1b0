/// Dashboard configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the upload service (default: `http://localhost:8000`).
    pub upload_url: String,
    /// WebSocket URL of the push-event source (default: `ws://localhost:8001/ws`).
    pub channel_ws_url: String,
    /// Origin of the download service used to synthesize URLs from raw
    /// storage identifiers (default: `http://localhost:8002`).
    pub download_base_url: String,
    /// Resolved user identity, if any; uploads fall back to `unknown`.
    pub user_id: Option<String>,
    /// Reconnection attempt budget for the event channel (default: `5`).
    pub reconnect_max_attempts: u32,
}

impl DashboardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                  |
    /// |---------------------------------|--------------------------|
    /// | `UPLOAD_URL`                    | `http://localhost:8000`  |
    /// | `CHANNEL_WS_URL`                | `ws://localhost:8001/ws` |
    /// | `DOWNLOAD_BASE_URL`             | `http://localhost:8002`  |
    /// | `USER_ID`                       | unset                    |
    /// | `CHANNEL_RECONNECT_MAX_ATTEMPTS`| `5`                      |
    pub fn from_env() -> Self {
        let upload_url =
            std::env::var("UPLOAD_URL").unwrap_or_else(|_| "http://localhost:8000".into());

        let channel_ws_url =
            std::env::var("CHANNEL_WS_URL").unwrap_or_else(|_| "ws://localhost:8001/ws".into());

        let download_base_url =
            std::env::var("DOWNLOAD_BASE_URL").unwrap_or_else(|_| "http://localhost:8002".into());

        let user_id = std::env::var("USER_ID").ok().filter(|s| !s.is_empty());

        let reconnect_max_attempts: u32 = std::env::var("CHANNEL_RECONNECT_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("CHANNEL_RECONNECT_MAX_ATTEMPTS must be a valid u32");

        Self {
            upload_url,
            channel_ws_url,
            download_base_url,
            user_id,
            reconnect_max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_environment() {
        let config = DashboardConfig::from_env();
        assert_eq!(config.upload_url, "http://localhost:8000");
        assert_eq!(config.channel_ws_url, "ws://localhost:8001/ws");
        assert_eq!(config.download_base_url, "http://localhost:8002");
        assert_eq!(config.reconnect_max_attempts, 5);
    }
}
