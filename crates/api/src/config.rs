use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long to wait for background tasks after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Period between live feed snapshots in seconds (default: `5`).
    pub live_feed_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                         |
    /// |---------------------------|-------------------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                                       |
    /// | `PORT`                    | `8080`                                          |
    /// | `CORS_ORIGINS`            | `http://127.0.0.1:5173,http://localhost:5173`   |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                                            |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                                            |
    /// | `LIVE_FEED_INTERVAL_SECS` | `5`                                             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://127.0.0.1:5173,http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let live_feed_interval_secs: u64 = std::env::var("LIVE_FEED_INTERVAL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("LIVE_FEED_INTERVAL_SECS must be a valid u64");
        assert!(
            live_feed_interval_secs > 0,
            "LIVE_FEED_INTERVAL_SECS must be greater than zero"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            live_feed_interval_secs,
        }
    }

    pub fn live_feed_interval(&self) -> Duration {
        Duration::from_secs(self.live_feed_interval_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Split a comma-separated origin list, trimming blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
