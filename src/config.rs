use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "ndtv.com",
    "bbc.com",
    "reuters.com",
    "indiatimes.com",
    "thehindu.com",
    "indianexpress.com",
    "timesofindia.com",
    "cnn.com",
    "gov.in",
    "who.int",
    "un.org",
];

/// Bounds accepted for the per-request result count.
pub const MIN_RESULTS: usize = 3;
pub const MAX_RESULTS: usize = 15;

/// Largest idle TTL a `chrono::Duration` can hold in whole seconds.
pub const MAX_SESSION_TTL_SECONDS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("TAVILY_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchSettings,
    pub trust: TrustSettings,
    pub auth: AuthSettings,
    pub session: SessionSettings,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub default_max_results: usize,
}

// Keeps the key out of `{:?}` output.
impl std::fmt::Debug for SearchSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_max_results", &self.default_max_results)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustSettings {
    pub domains: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub history_display_limit: usize,
    pub max_sessions: usize,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8501,
                workers: num_cpus::get(),
            },
            search: SearchSettings {
                api_key: String::new(),
                base_url: "https://api.tavily.com".to_string(),
                default_max_results: 5,
            },
            trust: TrustSettings {
                domains: DEFAULT_TRUSTED_DOMAINS
                    .iter()
                    .map(|d| d.to_string())
                    .collect(),
            },
            auth: AuthSettings {
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
            session: SessionSettings {
                history_display_limit: 10,
                max_sessions: 1000,
                ttl_seconds: 86_400,
            },
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
            },
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // Server configuration
        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.server.port = parse_var("PORT", &port)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            config.server.workers = parse_var("WORKERS", &workers)?;
        }

        // Search provider
        if let Some(api_key) = lookup("TAVILY_API_KEY") {
            config.search.api_key = api_key.trim().to_string();
        }
        if let Some(base_url) = lookup("TAVILY_BASE_URL") {
            config.search.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(default_max_results) = lookup("SEARCH_DEFAULT_MAX_RESULTS") {
            config.search.default_max_results =
                parse_var("SEARCH_DEFAULT_MAX_RESULTS", &default_max_results)?;
        }

        // Trust allowlist
        if let Some(domains) = lookup("TRUSTED_DOMAINS") {
            config.trust.domains = split_list(&domains);
        }

        // Login credentials
        if let Some(username) = lookup("AUTH_USERNAME") {
            config.auth.username = username;
        }
        if let Some(password) = lookup("AUTH_PASSWORD") {
            config.auth.password = password;
        }

        // Sessions
        if let Some(limit) = lookup("HISTORY_DISPLAY_LIMIT") {
            config.session.history_display_limit = parse_var("HISTORY_DISPLAY_LIMIT", &limit)?;
        }
        if let Some(max_sessions) = lookup("MAX_SESSIONS") {
            config.session.max_sessions = parse_var("MAX_SESSIONS", &max_sessions)?;
        }
        if let Some(ttl) = lookup("SESSION_TTL_SECONDS") {
            config.session.ttl_seconds = parse_var("SESSION_TTL_SECONDS", &ttl)?;
        }

        // Security configuration
        if let Some(allowed_origins) = lookup("ALLOWED_ORIGINS") {
            config.security.allowed_origins = split_list(&allowed_origins);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that must hold before any request is served.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&self.search.default_max_results) {
            return Err(ConfigError::InvalidValue {
                name: "SEARCH_DEFAULT_MAX_RESULTS",
                reason: format!("must be between {} and {}", MIN_RESULTS, MAX_RESULTS),
            });
        }
        if self.server.workers == 0 {
            return Err(ConfigError::InvalidValue {
                name: "WORKERS",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.session.ttl_seconds > MAX_SESSION_TTL_SECONDS {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_SECONDS",
                reason: format!("must not exceed {}", MAX_SESSION_TTL_SECONDS),
            });
        }
        if self.session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_SESSIONS",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn blank_api_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("TAVILY_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("TAVILY_API_KEY", "tvly-test")])).unwrap();
        assert_eq!(config.search.api_key, "tvly-test");
        assert_eq!(config.search.default_max_results, 5);
        assert_eq!(config.trust.domains.len(), DEFAULT_TRUSTED_DOMAINS.len());
        assert_eq!(config.session.history_display_limit, 10);
        assert_eq!(config.auth.username, "admin");
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-test"),
            ("TAVILY_BASE_URL", "http://localhost:9000/"),
            ("TRUSTED_DOMAINS", "bbc.com, reuters.com ,,"),
            ("PORT", "9090"),
            ("HISTORY_DISPLAY_LIMIT", "3"),
        ]))
        .unwrap();
        assert_eq!(config.search.base_url, "http://localhost:9000");
        assert_eq!(config.trust.domains, vec!["bbc.com", "reuters.com"]);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.session.history_display_limit, 3);
    }

    #[test]
    fn unparsable_number_names_the_variable() {
        let err = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-test"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn default_limit_outside_bounds_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-test"),
            ("SEARCH_DEFAULT_MAX_RESULTS", "20"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SEARCH_DEFAULT_MAX_RESULTS"));
    }

    #[rstest]
    #[case("SESSION_TTL_SECONDS", "10000000000000000")]
    #[case("SESSION_TTL_SECONDS", "18446744073709551615")]
    #[case("WORKERS", "0")]
    #[case("MAX_SESSIONS", "0")]
    fn values_that_would_break_the_server_are_rejected(
        #[case] name: &str,
        #[case] value: &str,
    ) {
        let err = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-test"),
            (name, value),
        ]))
        .unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::InvalidValue { name: reported, .. }) => assert_eq!(*reported, name),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn largest_session_ttl_is_accepted() {
        let ttl = MAX_SESSION_TTL_SECONDS.to_string();
        let config = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-test"),
            ("SESSION_TTL_SECONDS", ttl.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.session.ttl_seconds, MAX_SESSION_TTL_SECONDS);
    }

    #[test]
    fn serialized_config_omits_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-secret"),
            ("AUTH_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("tvly-secret"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("\"username\":\"admin\""));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            ("TAVILY_API_KEY", "tvly-secret"),
            ("AUTH_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("tvly-secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
