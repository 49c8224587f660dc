//! Client configuration with build-time defaults and optional runtime overrides.
//! The browser shell reads overrides from `window.DOCSCAN_CONFIG` so static
//! deployments can point at a different API without rebuilding. Values here are
//! public; never place secrets in them.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3_000;
pub const DEFAULT_REGISTRATION_REDIRECT_DELAY_MS: u64 = 3_000;
pub const DEFAULT_SESSION_STORAGE_KEY: &str = "username";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_POST_LOGIN_PATH: &str = "/page/profile";
pub const DEFAULT_PROTECTED_SEGMENTS: [&str; 4] = ["profile", "upload", "matches", "credits"];

const MAX_DELAY_MS: u64 = 600_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
    #[error("{field} must be between 1 and 600000 milliseconds")]
    InvalidDelay { field: &'static str },
    #[error("session storage key must not be empty")]
    EmptyStorageKey,
    #[error("post-login path must start with `/`")]
    InvalidPostLoginPath,
    #[error("runtime config is not valid JSON: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Empty means same-origin requests.
    pub api_base_url: String,
    pub notification_ttl: Duration,
    pub registration_redirect_delay: Duration,
    pub protected_segments: Vec<String>,
    pub session_storage_key: String,
    /// Where a successful login goes when the server sends no redirect.
    pub post_login_path: String,
    pub request_timeout: Option<Duration>,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            notification_ttl: Duration::from_millis(DEFAULT_NOTIFICATION_TTL_MS),
            registration_redirect_delay: Duration::from_millis(
                DEFAULT_REGISTRATION_REDIRECT_DELAY_MS,
            ),
            protected_segments: DEFAULT_PROTECTED_SEGMENTS
                .iter()
                .map(ToString::to_string)
                .collect(),
            session_storage_key: DEFAULT_SESSION_STORAGE_KEY.to_string(),
            post_login_path: DEFAULT_POST_LOGIN_PATH.to_string(),
            request_timeout: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Optional fields accepted from the runtime config object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeOverrides {
    pub api_base_url: Option<String>,
    pub notification_ttl_ms: Option<u64>,
    pub registration_redirect_delay_ms: Option<u64>,
    pub protected_segments: Option<Vec<String>>,
    pub session_storage_key: Option<String>,
    pub post_login_path: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl RuntimeOverrides {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|error| ConfigError::Malformed(error.to_string()))
    }
}

impl ClientConfig {
    /// Builds the config from an optional build-time base URL and runtime overrides.
    pub fn resolve(
        build_time_base_url: Option<&str>,
        overrides: Option<RuntimeOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = build_time_base_url {
            config.api_base_url = normalize_base_url(base_url)?;
        }
        if let Some(overrides) = overrides {
            config.apply_overrides(overrides)?;
        }
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: RuntimeOverrides) -> Result<(), ConfigError> {
        if let Some(value) = overrides.api_base_url {
            self.api_base_url = normalize_base_url(&value)?;
        }
        if let Some(value) = overrides.notification_ttl_ms {
            self.notification_ttl = validated_delay("notification_ttl_ms", value)?;
        }
        if let Some(value) = overrides.registration_redirect_delay_ms {
            self.registration_redirect_delay =
                validated_delay("registration_redirect_delay_ms", value)?;
        }
        if let Some(segments) = overrides.protected_segments {
            self.protected_segments = segments
                .into_iter()
                .map(|segment| segment.trim().to_string())
                .filter(|segment| !segment.is_empty())
                .collect();
        }
        if let Some(key) = overrides.session_storage_key {
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyStorageKey);
            }
            self.session_storage_key = key.to_string();
        }
        if let Some(path) = overrides.post_login_path {
            let path = path.trim();
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidPostLoginPath);
            }
            self.post_login_path = path.to_string();
        }
        if let Some(value) = overrides.request_timeout_ms {
            self.request_timeout = if value == 0 {
                None
            } else {
                Some(validated_delay("request_timeout_ms", value)?)
            };
        }
        if let Some(level) = overrides
            .log_level
            .map(|level| level.trim().to_ascii_lowercase())
            .filter(|level| !level.is_empty())
        {
            self.log_level = level;
        }
        Ok(())
    }

    /// Joins a relative API path onto the configured base URL. Absolute URLs pass through.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }

    pub fn is_protected_segment(&self, segment: &str) -> bool {
        self.protected_segments
            .iter()
            .any(|protected| protected == segment)
    }
}

fn validated_delay(field: &'static str, value: u64) -> Result<Duration, ConfigError> {
    if value == 0 || value > MAX_DELAY_MS {
        return Err(ConfigError::InvalidDelay { field });
    }
    Ok(Duration::from_millis(value))
}

/// Empty input means same-origin and is accepted as-is.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

pub fn join_url(base_url: &str, path: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_timings() {
        let config = ClientConfig::default();
        assert_eq!(config.notification_ttl, Duration::from_secs(3));
        assert_eq!(config.registration_redirect_delay, Duration::from_secs(3));
        assert_eq!(config.session_storage_key, "username");
        assert!(config.is_protected_segment("profile"));
        assert!(!config.is_protected_segment("login"));
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.post_login_path, "/page/profile");
    }

    #[test]
    fn normalize_base_url_trims_and_drops_trailing_slash() {
        let normalized = normalize_base_url(" https://docscan.test/ ").expect("valid url");
        assert_eq!(normalized, "https://docscan.test");
    }

    #[test]
    fn normalize_base_url_allows_same_origin() {
        assert_eq!(normalize_base_url("  ").expect("empty is same-origin"), "");
    }

    #[test]
    fn normalize_base_url_requires_http_scheme() {
        let error = normalize_base_url("docscan.test").expect_err("expected invalid url");
        assert_eq!(error, ConfigError::InvalidBaseUrl);
    }

    #[test]
    fn runtime_overrides_win_over_build_time_base() {
        let overrides = RuntimeOverrides::from_json(
            r#"{"api_base_url":"https://api.docscan.test/","notification_ttl_ms":5000,"protected_segments":["admin"," "]}"#,
        )
        .expect("valid overrides");
        let config = ClientConfig::resolve(Some("https://build.docscan.test"), Some(overrides))
            .expect("resolved");
        assert_eq!(config.api_base_url, "https://api.docscan.test");
        assert_eq!(config.notification_ttl, Duration::from_secs(5));
        assert_eq!(config.protected_segments, vec!["admin".to_string()]);
    }

    #[test]
    fn post_login_path_override_must_be_absolute() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(RuntimeOverrides {
                post_login_path: Some(" /page/upload ".to_string()),
                ..RuntimeOverrides::default()
            })
            .expect("applied");
        assert_eq!(config.post_login_path, "/page/upload");

        let error = config
            .apply_overrides(RuntimeOverrides {
                post_login_path: Some("page/index".to_string()),
                ..RuntimeOverrides::default()
            })
            .expect_err("relative path rejected");
        assert_eq!(error, ConfigError::InvalidPostLoginPath);
        assert_eq!(config.post_login_path, "/page/upload");
    }

    #[test]
    fn zero_request_timeout_disables_it() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(RuntimeOverrides {
                request_timeout_ms: Some(0),
                ..RuntimeOverrides::default()
            })
            .expect("applied");
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn rejects_zero_notification_ttl() {
        let error = ClientConfig::resolve(
            None,
            Some(RuntimeOverrides {
                notification_ttl_ms: Some(0),
                ..RuntimeOverrides::default()
            }),
        )
        .expect_err("zero ttl rejected");
        assert_eq!(
            error,
            ConfigError::InvalidDelay {
                field: "notification_ttl_ms"
            }
        );
    }

    #[test]
    fn malformed_runtime_config_is_reported() {
        assert!(matches!(
            RuntimeOverrides::from_json("not json"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn join_url_handles_relative_and_absolute_paths() {
        assert_eq!(join_url("", "/user/profile"), "/user/profile");
        assert_eq!(
            join_url("https://api.docscan.test", "/user/profile"),
            "https://api.docscan.test/user/profile"
        );
        assert_eq!(
            join_url("https://api.docscan.test", "https://other.docscan.test/x"),
            "https://other.docscan.test/x"
        );
    }
}
