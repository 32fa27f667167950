//! Harness configuration
//!
//! Loaded once from a JSON file, optionally patched from the environment,
//! then shared read-only (`Arc<HarnessConfig>`) with everything that needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variables that override file values
pub const ENV_BASE_URL: &str = "STOREFRONT_E2E_BASE_URL";
pub const ENV_API_URL: &str = "STOREFRONT_E2E_API_URL";
pub const ENV_ADMIN_EMAIL: &str = "STOREFRONT_E2E_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "STOREFRONT_E2E_ADMIN_PASSWORD";
pub const ENV_ADMIN_CODE: &str = "STOREFRONT_E2E_ADMIN_CODE";
pub const ENV_HEADLESS: &str = "STOREFRONT_E2E_HEADLESS";

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Storefront UI base URL
    pub base_url: String,

    /// Storefront API base URL
    pub api_url: String,

    /// Request and UI wait timeout, in seconds
    pub timeout: u64,

    /// Interval between re-checks in polling loops
    pub poll_interval_ms: u64,

    /// Run the browser without a window
    pub headless: bool,

    /// Browser engine
    pub browser: BrowserKind,

    /// Browser viewport
    pub viewport: Viewport,

    /// Where browser screenshots are written
    pub screenshot_dir: PathBuf,

    /// Shared administrative account used for cleanup
    pub admin: AdminCredentials,

    /// Code gating elevated (admin) registration
    pub admin_creation_code: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_url: "http://localhost:5000".to_string(),
            timeout: 10,
            poll_interval_ms: 500,
            headless: false,
            browser: BrowserKind::default(),
            viewport: Viewport::default(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            admin: AdminCredentials::default(),
            admin_creation_code: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            email: "admin@test.com".to_string(),
            password: "Admin123456".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    #[serde(alias = "chrome")]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserKind {
    /// Name of the Playwright launcher object
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserKind::Chromium => "chromium",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Webkit => "webkit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(email) = lookup(ENV_ADMIN_EMAIL) {
            self.admin.email = email;
        }
        if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
            self.admin.password = password;
        }
        if let Some(code) = lookup(ENV_ADMIN_CODE) {
            self.admin_creation_code = code;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = parse_flag(&raw).ok_or_else(|| {
                Error::InvalidConfig(format!("{} must be true/false or 1/0, got '{}'", ENV_HEADLESS, raw))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        for (field, url) in [("base_url", &self.base_url), ("api_url", &self.api_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if self.timeout == 0 {
            return Err(Error::InvalidConfig("timeout must be positive".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// API base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// UI base URL without a trailing slash
    pub fn ui_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = HarnessConfig::from_json_str(
            r#"{"api_url": "http://api.local:5000", "admin": {"email": "root@shop.test"}}"#,
        )
        .unwrap();

        assert_eq!(config.api_url, "http://api.local:5000");
        assert_eq!(config.admin.email, "root@shop.test");
        assert_eq!(config.admin.password, "Admin123456");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.browser, BrowserKind::Chromium);
    }

    #[test]
    fn test_chrome_alias() {
        let config = HarnessConfig::from_json_str(r#"{"browser": "chrome"}"#).unwrap();
        assert_eq!(config.browser, BrowserKind::Chromium);
    }

    #[test]
    fn test_rejects_bad_url_and_zero_timeout() {
        assert!(HarnessConfig::from_json_str(r#"{"api_url": "localhost:5000"}"#).is_err());
        assert!(HarnessConfig::from_json_str(r#"{"timeout": 0}"#).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ADMIN_PASSWORD, "s3cret"),
            (ENV_ADMIN_CODE, "letmein"),
            (ENV_HEADLESS, "1"),
        ]
        .into_iter()
        .collect();

        let mut config = HarnessConfig::default();
        config
            .apply_overrides_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.admin.password, "s3cret");
        assert_eq!(config.admin_creation_code, "letmein");
        assert!(config.headless);
        assert_eq!(config.admin.email, "admin@test.com");
    }

    #[test]
    fn test_invalid_headless_override() {
        let mut config = HarnessConfig::default();
        let result = config.apply_overrides_from(|key| {
            (key == ENV_HEADLESS).then(|| "maybe".to_string())
        });
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = HarnessConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_roots_trim_trailing_slash() {
        let config = HarnessConfig {
            api_url: "http://api.local/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.api_root(), "http://api.local");
    }
}
