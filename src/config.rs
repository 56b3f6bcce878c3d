//! Service configuration.
//!
//! Everything the URL builder needs to talk to an imgproxy instance: the
//! base URL, the optional signing key and salt, and the default output
//! quality used when a transform does not set one.
//!
//! ## Layering
//!
//! Values are resolved lowest to highest:
//!
//! ```text
//! stock defaults          (everything unset, used when there is no file)
//!   ← imgproxy.toml       (optional file in the project root)
//!     ← environment       (IMGPROXY_URL, IMGPROXY_KEY, IMGPROXY_SALT,
//!                          IMGPROXY_DEFAULT_QUALITY)
//! ```
//!
//! The transform engine never reads the environment itself. Callers resolve
//! an [`ImgproxyConfig`] once and hand it to
//! [`Imgproxy::new`](crate::Imgproxy::new) or
//! [`UrlBuilder::new`](crate::UrlBuilder::new).
//!
//! ## File format
//!
//! ```toml
//! url = "https://img.example.com"
//! key = "943b421c9eb07c83"   # hex, optional
//! salt = "520f986b998545b4"  # hex, optional
//! default_quality = 82       # 1-100, optional
//! ```
//!
//! Unknown keys are rejected to catch typos early. A missing `url` is not a
//! config-file error: it is reported when a URL builder is created.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "imgproxy.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImgproxyConfig {
    /// Base URL of the imgproxy instance, e.g. `https://img.example.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Hex-encoded signing key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Hex-encoded signing salt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    /// Output quality applied when a transform sets none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_quality: Option<u32>,
}

impl ImgproxyConfig {
    /// Config pointing at `url` with no signing and no default quality.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_signing(mut self, key: impl Into<String>, salt: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self.salt = Some(salt.into());
        self
    }

    pub fn with_default_quality(mut self, quality: u32) -> Self {
        self.default_quality = Some(quality);
        self
    }

    /// Validate value ranges and key encoding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(q) = self.default_quality
            && !(1..=100).contains(&q)
        {
            return Err(ConfigError::Validation(
                "default_quality must be 1-100".into(),
            ));
        }
        for (name, value) in [("key", &self.key), ("salt", &self.salt)] {
            if let Some(v) = value
                && hex::decode(v).is_err()
            {
                return Err(ConfigError::Validation(format!(
                    "{name} must be hex-encoded"
                )));
            }
        }
        Ok(())
    }

    /// Overlay `IMGPROXY_*` variables from `vars` onto this config.
    ///
    /// Empty values are ignored. Unrelated variables are skipped.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match name.as_ref() {
                "IMGPROXY_URL" => self.url = Some(value),
                "IMGPROXY_KEY" => self.key = Some(value),
                "IMGPROXY_SALT" => self.salt = Some(value),
                "IMGPROXY_DEFAULT_QUALITY" => {
                    let q = value.trim().parse().map_err(|_| {
                        ConfigError::Validation(format!(
                            "IMGPROXY_DEFAULT_QUALITY must be an integer, got `{value}`"
                        ))
                    })?;
                    self.default_quality = Some(q);
                }
                _ => {}
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Stock defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_vars(std::env::vars())
    }
}

/// Parse and validate a config file.
pub fn load_file(path: &Path) -> Result<ImgproxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ImgproxyConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// `imgproxy.toml` in `dir` (or stock defaults when absent), overlaid with
/// `vars`.
pub fn load_config_with_vars<I, K, V>(dir: &Path, vars: I) -> Result<ImgproxyConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let path = dir.join(CONFIG_FILENAME);
    let config = if path.exists() {
        load_file(&path)?
    } else {
        ImgproxyConfig::default()
    };
    config.with_env_vars(vars)
}

/// Load `imgproxy.toml` from `dir`, then overlay the process environment.
pub fn load_config(dir: &Path) -> Result<ImgproxyConfig, ConfigError> {
    load_config_with_vars(dir, std::env::vars())
}
