//! Runtime settings.
//!
//! Read from an optional TOML file, then overridden by the environment. The
//! API key is only ever taken from the environment and is required by every
//! operation that talks to the API.
//!
//! ```toml
//! output_dir = "exports"
//! page_size = 100
//! reply_concurrency = 4
//! failure_policy = "truncate"   # or "abort"
//! request_timeout_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::TubeError;
use crate::pagination::{CollectOptions, FailurePolicy};
use crate::youtube::MAX_PAGE_SIZE;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const API_BASE_ENV: &str = "TUBETHREADS_API_BASE";
pub const OUTPUT_DIR_ENV: &str = "TUBETHREADS_OUTPUT_DIR";

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    #[serde(skip)]
    pub api_key: Option<String>,
    pub api_base: String,
    pub output_dir: PathBuf,
    pub page_size: u32,
    pub reply_concurrency: usize,
    pub failure_policy: FailurePolicy,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from("output"),
            page_size: MAX_PAGE_SIZE,
            reply_concurrency: 1,
            failure_policy: FailurePolicy::Truncate,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// `<config dir>/tubethreads/config.toml`, e.g. `~/.config/tubethreads/config.toml`.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("tubethreads").join("config.toml")
    }

    /// Load settings from `path` if given, otherwise from [`Settings::default_path`]
    /// when that file exists, then apply environment overrides and validate.
    ///
    /// An explicit `path` that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, TubeError> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Self::default_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, TubeError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TubeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| TubeError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self, TubeError> {
        toml::from_str(content).map_err(|e| TubeError::Config(e.to_string()))
    }

    /// Apply environment overrides through `lookup`, which is `std::env::var`
    /// in production and a map in tests.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.trim().is_empty()) {
            self.api_base = base.trim().to_string();
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.output_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn validate(&self) -> Result<(), TubeError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(TubeError::Config(format!(
                "page_size must be in 1..={}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }
        if self.reply_concurrency == 0 {
            return Err(TubeError::Config(
                "reply_concurrency must be >= 1".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(TubeError::Config(
                "request_timeout_secs must be > 0 when set".to_string(),
            ));
        }
        crate::transport::parse_base_url(&self.api_base)?;
        Ok(())
    }

    /// The API key, or a configuration error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, TubeError> {
        self.api_key.as_deref().ok_or_else(|| {
            TubeError::Config(format!("{} environment variable not set", API_KEY_ENV))
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn collect_options(&self) -> CollectOptions {
        CollectOptions {
            failure_policy: self.failure_policy,
            reply_concurrency: self.reply_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid_but_keyless() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.failure_policy, FailurePolicy::Truncate);
        assert_eq!(
            settings.require_api_key().unwrap_err().code_str(),
            "config_error"
        );
    }

    #[test]
    fn parses_toml_with_defaults() {
        let settings = Settings::from_toml(
            r#"
            output_dir = "exports"
            reply_concurrency = 4
            failure_policy = "abort"
            "#,
        )
        .unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("exports"));
        assert_eq!(settings.reply_concurrency, 4);
        assert_eq!(settings.failure_policy, FailurePolicy::Abort);
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Settings::from_toml("api_secret = \"x\"").is_err());
    }

    #[test]
    fn api_key_is_not_read_from_file() {
        let err = Settings::from_toml("api_key = \"AIzaFromFile\"").unwrap_err();
        assert_eq!(err.code_str(), "config_error");
    }

    #[test]
    fn environment_overrides_file() {
        let mut settings = Settings::from_toml("output_dir = \"from-file\"").unwrap();
        settings.apply_env(env(&[
            (API_KEY_ENV, " abc123 "),
            (OUTPUT_DIR_ENV, "from-env"),
        ]));
        assert_eq!(settings.require_api_key().unwrap(), "abc123");
        assert_eq!(settings.output_dir, PathBuf::from("from-env"));
    }

    #[test]
    fn blank_key_is_ignored() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[(API_KEY_ENV, "   ")]));
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn validates_ranges() {
        let mut settings = Settings {
            page_size: 101,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());

        settings.page_size = 50;
        settings.reply_concurrency = 0;
        assert!(settings.validate().is_err());

        settings.reply_concurrency = 2;
        settings.api_base = "::nope::".to_string();
        assert!(settings.validate().is_err());
    }
}
