//! Browser configuration: defaults, an optional RON file, then environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::errors::{ConfigError, ConfigResult};
use crate::filters::MatchMode;
use crate::pagination::DEFAULT_PAGE_SIZE;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Environment variable that overrides `api_base`.
pub const API_BASE_ENV: &str = "POKEDEX_API_BASE";
/// Largest page the backend will serve.
pub const MAX_PAGE_SIZE: u64 = 100;
pub const MAX_DEBOUNCE_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub api_base: String,
    pub page_size: u64,
    pub debounce_ms: u64,
    pub match_mode: MatchMode,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            match_mode: MatchMode::All,
        }
    }
}

impl BrowserConfig {
    /// Parses a RON document; missing fields keep their defaults.
    ///
    /// ```text
    /// (api_base: "http://localhost:8000", page_size: 20, debounce_ms: 300, match_mode: any)
    /// ```
    pub fn from_ron_str(source: &str) -> ConfigResult<Self> {
        let config: BrowserConfig = ron::from_str(source)?;
        config.validate()
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Self::from_ron_str(&source)
    }

    /// Defaults, overlaid by `path` (if given), overlaid by the environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies environment overrides through `lookup`, so tests never touch
    /// the real process environment.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(api_base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("{} overrides api_base", API_BASE_ENV);
            self.api_base = api_base.trim().to_string();
        }
        self.validate()
    }

    pub fn validate(self) -> ConfigResult<Self> {
        match url::Url::parse(&self.api_base) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::InvalidBaseUrl {
                    url: self.api_base.clone(),
                    reason: format!("unsupported scheme '{}'", parsed.scheme()),
                })
            }
            Err(e) => {
                return Err(ConfigError::InvalidBaseUrl {
                    url: self.api_base.clone(),
                    reason: e.to_string(),
                })
            }
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        if self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::InvalidDebounce(self.debounce_ms));
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = BrowserConfig::default().validate().expect("defaults should validate");
        assert_eq!(config.api_base, "http://localhost:8000");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = BrowserConfig::from_ron_str(r#"(page_size: 50, match_mode: any)"#)
            .expect("config should parse");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.match_mode, MatchMode::Any);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = BrowserConfig::from_ron_str(r#"(api_base: "http://file:1")"#)
            .and_then(|c| {
                c.with_env_overrides(|key| {
                    (key == API_BASE_ENV).then(|| " https://pokedex.example ".to_string())
                })
            })
            .expect("config should load");
        assert_eq!(config.api_base, "https://pokedex.example");
    }

    #[test]
    fn test_rejects_out_of_range_page_size() {
        let result = BrowserConfig::from_ron_str("(page_size: 500)");
        assert!(matches!(result, Err(ConfigError::InvalidPageSize(500))));
        let result = BrowserConfig::from_ron_str("(page_size: 0)");
        assert!(matches!(result, Err(ConfigError::InvalidPageSize(0))));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let result = BrowserConfig::from_ron_str(r#"(api_base: "ftp://somewhere")"#);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
        let result = BrowserConfig::from_ron_str(r#"(api_base: "not a url")"#);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = BrowserConfig::from_ron_str("(page_size: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = BrowserConfig::from_file(Path::new("/definitely/not/here.ron"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
