//! Storefront configuration loaded from environment variables and the stored
//! preferences file.
//!
//! # Environment Variables
//!
//! All optional:
//! - `LESSON_SHOP_API_BASE` - Base URL of the lessons backend
//! - `LESSON_SHOP_PREFERENCES` - Preferences file (default: `$HOME/.lesson-shop.json`)
//! - `LESSON_SHOP_SEARCH_DEBOUNCE_MS` - Live search debounce window (default: 300)
//! - `LESSON_SHOP_HTTP_TIMEOUT_SECS` - Request timeout (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! # API base resolution
//!
//! An explicit override (e.g. a CLI flag) wins, then `LESSON_SHOP_API_BASE`,
//! then the `api_base` stored in the preferences file, then
//! [`DEFAULT_API_BASE`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "https://woloo-backend.onrender.com";

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const PREFERENCES_FILE_NAME: &str = ".lesson-shop.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid API base URL {0:?}: {1}")]
    InvalidApiBase(String, String),
    #[error("Failed to read preferences {}: {source}", .path.display())]
    ReadPreferences {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write preferences {}: {source}", .path.display())]
    WritePreferences {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed preferences {}: {source}", .path.display())]
    MalformedPreferences {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Lesson Shop configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Base URL of the lessons backend, without a trailing slash
    pub api_base: Url,
    /// How long live search waits for typing to settle
    pub search_debounce: Duration,
    /// Per-request timeout for backend calls
    pub http_timeout: Duration,
    /// Where the stored preferences live
    pub preferences_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Locally stored user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Overrides the default backend address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl ShopConfig {
    /// Load configuration from environment variables and stored preferences.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    /// `api_base_override` takes precedence over every other source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, the preferences file
    /// cannot be read, or the resolved API base is not an http(s) URL.
    pub fn from_env(api_base_override: Option<&str>) -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let preferences_path = preferences_path();
        let preferences = Preferences::load(&preferences_path)?;

        let api_base = resolve_api_base(
            api_base_override,
            get_optional_env("LESSON_SHOP_API_BASE").as_deref(),
            &preferences,
        )?;

        let search_debounce = Duration::from_millis(get_env_u64(
            "LESSON_SHOP_SEARCH_DEBOUNCE_MS",
            DEFAULT_SEARCH_DEBOUNCE_MS,
        )?);
        let http_timeout = Duration::from_secs(get_env_u64(
            "LESSON_SHOP_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);

        Ok(Self {
            api_base,
            search_debounce,
            http_timeout,
            preferences_path,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Build a configuration for a known backend with default settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiBase` if `api_base` is not an http(s) URL.
    pub fn for_api_base(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_api_base(api_base)?,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            preferences_path: default_preferences_path(),
            sentry_dsn: None,
        })
    }

    /// Absolute URL for a backend path such as `/lessons`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Preferences {
    /// Read preferences from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::ReadPreferences {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| ConfigError::MalformedPreferences {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write preferences to `path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            ConfigError::MalformedPreferences {
                path: path.to_path_buf(),
                source,
            }
        })?;

        std::fs::write(path, json).map_err(|source| ConfigError::WritePreferences {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Pick the API base from the first source that provides one.
fn resolve_api_base(
    explicit: Option<&str>,
    env: Option<&str>,
    preferences: &Preferences,
) -> Result<Url, ConfigError> {
    let raw = explicit
        .or(env)
        .or(preferences.api_base.as_deref())
        .unwrap_or(DEFAULT_API_BASE);
    parse_api_base(raw)
}

/// Parse and normalise a backend base URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidApiBase` for unparsable or non-http(s) URLs.
pub fn parse_api_base(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidApiBase(raw.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiBase(
            raw.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Where stored preferences live: `LESSON_SHOP_PREFERENCES` if set, else
/// the default location.
///
/// Loads `.env` first so the variable may come from there.
#[must_use]
pub fn preferences_path() -> PathBuf {
    let _ = dotenvy::dotenv();
    get_optional_env("LESSON_SHOP_PREFERENCES").map_or_else(default_preferences_path, PathBuf::from)
}

/// `$HOME/.lesson-shop.json`, or the working directory without `HOME`.
fn default_preferences_path() -> PathBuf {
    get_optional_env("HOME").map_or_else(
        || PathBuf::from(PREFERENCES_FILE_NAME),
        |home| Path::new(&home).join(PREFERENCES_FILE_NAME),
    )
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a numeric environment variable with a default value.
fn get_env_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        value
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lesson-shop-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_default_api_base() {
        let url = resolve_api_base(None, None, &Preferences::default()).unwrap();
        assert_eq!(url.as_str(), "https://woloo-backend.onrender.com/");
    }

    #[test]
    fn test_resolution_order() {
        let prefs = Preferences {
            api_base: Some("http://prefs.local".to_string()),
        };

        let url = resolve_api_base(None, None, &prefs).unwrap();
        assert_eq!(url.host_str(), Some("prefs.local"));

        let url = resolve_api_base(None, Some("http://env.local"), &prefs).unwrap();
        assert_eq!(url.host_str(), Some("env.local"));

        let url = resolve_api_base(Some("http://flag.local"), Some("http://env.local"), &prefs)
            .unwrap();
        assert_eq!(url.host_str(), Some("flag.local"));
    }

    #[test]
    fn test_parse_api_base_rejects_bad_urls() {
        assert!(matches!(
            parse_api_base("not a url"),
            Err(ConfigError::InvalidApiBase(_, _))
        ));
        assert!(matches!(
            parse_api_base("ftp://files.local"),
            Err(ConfigError::InvalidApiBase(_, _))
        ));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = ShopConfig::for_api_base("http://localhost:8080/").unwrap();
        assert_eq!(config.endpoint("/lessons"), "http://localhost:8080/lessons");

        let config = ShopConfig::for_api_base("http://localhost:8080/api/").unwrap();
        assert_eq!(
            config.endpoint("lessons/A"),
            "http://localhost:8080/api/lessons/A"
        );
    }

    #[test]
    fn test_preferences_missing_file_is_default() {
        let prefs = Preferences::load(&temp_path("missing")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_preferences_save_and_load() {
        let path = temp_path("saved");
        let prefs = Preferences {
            api_base: Some("http://localhost:3000".to_string()),
        };
        prefs.save(&path).unwrap();

        assert_eq!(Preferences::load(&path).unwrap(), prefs);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_preferences_malformed() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{not json").unwrap();

        let result = Preferences::load(&path);
        assert!(matches!(
            result,
            Err(ConfigError::MalformedPreferences { .. })
        ));
        std::fs::remove_file(&path).unwrap();
    }
}
