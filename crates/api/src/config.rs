use crate::auth::jwt::JwtConfig;

/// Per-route-group rate limits (requests per window).
#[derive(Debug, Clone)]
pub struct RateLimits {
    /// `/api/auth`: requests per 15-minute window.
    pub auth_per_15_min: u32,
    /// `/api/properties` reads: requests per minute.
    pub search_per_min: u32,
    /// `/api/images`: requests per hour.
    pub image_per_hour: u32,
    /// Everything else under `/api`: requests per 15-minute window.
    pub general_per_15_min: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            auth_per_15_min: 5,
            search_per_min: 30,
            image_per_hour: 10,
            general_per_15_min: 100,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Per-group rate limits.
    pub rate_limits: RateLimits,
    /// Whether to apply rate limiting. Disabled in integration tests, where
    /// requests carry no peer address.
    pub rate_limiting_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `RATE_LIMIT_AUTH`         | `5`                     |
    /// | `RATE_LIMIT_SEARCH`       | `30`                    |
    /// | `RATE_LIMIT_IMAGE`        | `10`                    |
    /// | `RATE_LIMIT_GENERAL`      | `100`                   |
    ///
    /// # Panics
    ///
    /// Panics if a value is present but unparseable, or if `JWT_SECRET`
    /// is missing (see [`JwtConfig::from_env`]).
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

        let defaults = RateLimits::default();
        let rate_limits = RateLimits {
            auth_per_15_min: env_u32("RATE_LIMIT_AUTH", defaults.auth_per_15_min),
            search_per_min: env_u32("RATE_LIMIT_SEARCH", defaults.search_per_min),
            image_per_hour: env_u32("RATE_LIMIT_IMAGE", defaults.image_per_hour),
            general_per_15_min: env_u32("RATE_LIMIT_GENERAL", defaults.general_per_15_min),
        };

        let rate_limiting_enabled = std::env::var("RATE_LIMITING")
            .map(|v| v != "off" && v != "false" && v != "0")
            .unwrap_or(true);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            rate_limits,
            rate_limiting_enabled,
        }
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    match std::env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u32")),
        Err(_) => default,
    }
}
