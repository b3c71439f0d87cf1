use fitslot_core::timezone::{parse_timezone, DEFAULT_TIMEZONE};
use fitslot_worker::config::RefreshConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Timezone assigned to trainers created without one.
    pub default_timezone: String,
    /// Open-slot horizon and refresh period.
    pub refresh: RefreshConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `DEFAULT_TIMEZONE`     | `Europe/Athens`            |
    ///
    /// Horizon settings come from [`RefreshConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_timezone =
            std::env::var("DEFAULT_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into());
        parse_timezone(&default_timezone).expect("DEFAULT_TIMEZONE must be an IANA timezone");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_timezone,
            refresh: RefreshConfig::from_env(),
        }
    }
}
