use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Backend endpoints for the user directory and event log
    #[serde(default)]
    pub backends: BackendsConfig,
    /// Redis configuration for the shared snapshot store
    #[serde(default)]
    pub redis: RedisConfig,
    /// Snapshot cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Defaults derived via field defaults

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Server validations
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        // Backend validations
        if self.backends.directory_url.is_empty() {
            return Err("backends.directory_url must be set".into());
        }
        if self.backends.events_url.is_empty() {
            return Err("backends.events_url must be set".into());
        }
        for (name, value) in [
            ("backends.directory_url", &self.backends.directory_url),
            ("backends.events_url", &self.backends.events_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(format!("{name} is not a valid URL: {e}"));
            }
        }
        if self.backends.request_timeout_ms == 0 {
            return Err("backends.request_timeout_ms must be > 0".into());
        }
        if self.backends.page_size == 0 {
            return Err("backends.page_size must be > 0".into());
        }
        // Redis validation
        if self.redis.enabled {
            if self.redis.url.is_empty() {
                return Err("redis.enabled=true requires redis.url".into());
            }
            if self.redis.pool_size == 0 {
                return Err("redis.pool_size must be > 0".into());
            }
            if self.redis.timeout_ms == 0 {
                return Err("redis.timeout_ms must be > 0".into());
            }
        }
        // Cache validation
        if self.cache.key.is_empty() {
            return Err("cache.key must not be empty".into());
        }
        if self.cache.ttl_secs == 0 {
            return Err("cache.ttl_secs must be > 0".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendsConfig {
    /// User-directory listing endpoint
    pub directory_url: String,
    /// Event-log scan endpoint
    pub events_url: String,
    pub request_timeout_ms: u64,
    /// Page size hint passed to the directory listing
    pub page_size: u32,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            directory_url: String::new(),
            events_url: String::new(),
            request_timeout_ms: 10_000,
            page_size: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// When disabled the server falls back to an in-memory snapshot store.
    pub enabled: bool,
    pub url: String,
    pub pool_size: usize,
    pub timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 16,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Singleton key the snapshot is stored under.
    pub key: String,
    /// Snapshot time-to-live. A business constant carried over from the
    /// dashboard's refresh cadence, kept configurable rather than derived.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: "usage".to_string(),
            ttl_secs: 86_400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};

    /// Load configuration from an optional TOML file plus `TALLY__`-prefixed
    /// environment overrides, then validate it.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        builder = match path {
            Some(p) => builder.add_source(File::from(std::path::Path::new(p))),
            None => builder.add_source(File::with_name("tally").required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix("TALLY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let raw = builder.build().map_err(|e| e.to_string())?;
        let cfg: AppConfig = raw.try_deserialize().map_err(|e| e.to_string())?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            backends: BackendsConfig {
                directory_url: "http://localhost:9001/users".to_string(),
                events_url: "http://localhost:9002/events".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_with_backends_are_valid() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_backend_urls_rejected() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().unwrap_err().contains("directory_url"));
    }

    #[test]
    fn test_malformed_backend_url_rejected() {
        let mut cfg = valid_config();
        cfg.backends.events_url = "not a url".to_string();
        assert!(cfg.validate().unwrap_err().contains("events_url"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut cfg = valid_config();
        cfg.cache.ttl_secs = 0;
        assert!(cfg.validate().unwrap_err().contains("ttl_secs"));
    }

    #[test]
    fn test_redis_enabled_requires_url() {
        let mut cfg = valid_config();
        cfg.redis.enabled = true;
        cfg.redis.url = String::new();
        assert!(cfg.validate().unwrap_err().contains("redis.url"));
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut cfg = valid_config();
        cfg.logging.level = "loud".to_string();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }
}
