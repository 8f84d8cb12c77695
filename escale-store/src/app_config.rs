use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub booking: BookingRules,
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Left unset, the HTTP client's own defaults apply.
    pub timeout_seconds: Option<u64>,
    /// Sent as a bearer token on every upstream call when present.
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct RedisConfig {
    /// Favourites fall back to process memory when unset.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_service_fee_rate")]
    pub service_fee_rate: f64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self { service_fee_rate: default_service_fee_rate() }
    }
}

fn default_service_fee_rate() -> f64 { 0.10 }

#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Serve built-in demo places and episodes when the upstream is down.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests")]
    pub requests: i64,
    #[serde(default = "default_window")]
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { requests: default_requests(), window_seconds: default_window() }
    }
}

fn default_requests() -> i64 { 100 }
fn default_window() -> i64 { 60 }

/// `ESCALE__UPSTREAM__BASE_URL=http://api:4000` overrides `upstream.base_url`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("ESCALE").separator("__")
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_optional_sections() {
        let raw = r#"
            [server]
            port = 8080

            [upstream]
            base_url = "http://localhost:4000/api"

            [auth]
            jwt_secret = "secret"
        "#;

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.upstream.timeout_seconds.is_none());
        assert!(cfg.redis.url.is_none());
        assert!((cfg.booking.service_fee_rate - 0.10).abs() < f64::EPSILON);
        assert!(cfg.fallback.enabled);
        assert_eq!(cfg.rate_limit.requests, 100);
    }

    #[test]
    fn test_env_overrides_use_double_underscore_after_prefix() {
        let raw = r#"
            [server]
            port = 8080

            [upstream]
            base_url = "http://localhost:4000/api"

            [auth]
            jwt_secret = "secret"
        "#;
        let mut vars = config::Map::new();
        vars.insert("ESCALE__UPSTREAM__BASE_URL".to_string(), "http://api:4000".to_string());
        vars.insert("ESCALE_SERVER__PORT".to_string(), "9999".to_string());

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.upstream.base_url, "http://api:4000");
        assert_eq!(cfg.server.port, 8080);
    }
}
