//! imgproxy URL building and signing.
//!
//! ```text
//! <base>/<signature|insecure>/<w:…>/<h:…>/<options…>/<base64url source>[.<ext>]
//! ```
//!
//! The source URL is base64url-encoded without padding. When both a key and
//! a salt are configured the signature is
//! `base64url(HMAC-SHA256(key, salt ‖ path))`; otherwise the literal
//! `insecure` takes its place.
//!
//! A freshly built [`ImgproxyUrl`] renders in imgproxy's legacy basic format
//! (`/<rt>/<w>/<h>/<g>/<el>/<source>`) until
//! [`use_advanced_mode`](ImgproxyUrl::use_advanced_mode) is called. The
//! transform engine always switches to advanced mode.

mod options;
mod signing;

pub use options::{Gravity, OptionSet, ProcessingOption};

use crate::config::ImgproxyConfig;
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use signing::Signer;
use std::fmt;

const MISSING_URL: &str = "An imgproxy instance URL is required.";

/// Factory for [`ImgproxyUrl`]s bound to one imgproxy instance.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: String,
    signer: Option<Signer>,
}

impl UrlBuilder {
    /// Fails with [`Error::Configuration`] when the instance URL is missing or
    /// blank, or when the signing key/salt are not hex.
    pub fn new(config: &ImgproxyConfig) -> Result<Self> {
        let base = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Configuration(MISSING_URL.to_string()))?;

        let signer = match (config.key.as_deref(), config.salt.as_deref()) {
            (Some(key), Some(salt)) if !key.is_empty() && !salt.is_empty() => {
                Some(Signer::from_hex(key, salt)?)
            }
            _ => None,
        };

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            signer,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }

    pub fn build(&self, source_url: &str, width: u32, height: u32) -> ImgproxyUrl<'_> {
        ImgproxyUrl {
            builder: self,
            source_url: source_url.to_string(),
            width,
            height,
            advanced: false,
            options: OptionSet::new(),
            extension: None,
        }
    }
}

/// One transform URL under construction.
#[derive(Debug, Clone)]
pub struct ImgproxyUrl<'b> {
    builder: &'b UrlBuilder,
    source_url: String,
    width: u32,
    height: u32,
    advanced: bool,
    options: OptionSet,
    extension: Option<String>,
}

impl ImgproxyUrl<'_> {
    pub fn use_advanced_mode(&mut self) -> &mut Self {
        self.advanced = true;
        self
    }

    pub fn set_option(&mut self, option: ProcessingOption) -> &mut Self {
        self.options.set(option);
        self
    }

    pub fn set_extension(&mut self, extension: impl Into<String>) -> &mut Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn encoded_source(&self) -> String {
        let mut encoded = URL_SAFE_NO_PAD.encode(self.source_url.as_bytes());
        if let Some(ext) = &self.extension {
            encoded.push('.');
            encoded.push_str(ext);
        }
        encoded
    }

    /// The signed part of the URL, starting with `/`.
    pub fn path(&self) -> String {
        let mut segments = Vec::with_capacity(self.options.len() + 3);
        if self.advanced {
            segments.push(format!("w:{}", self.width));
            segments.push(format!("h:{}", self.height));
            segments.extend(self.options.segments());
        } else {
            segments.push(match self.options.get("rt") {
                Some(ProcessingOption::ResizingType(rt)) => rt.clone(),
                _ => "fit".to_string(),
            });
            segments.push(self.width.to_string());
            segments.push(self.height.to_string());
            segments.push(match self.options.get("g") {
                Some(ProcessingOption::Gravity(g)) => g.to_string(),
                _ => Gravity::Center.to_string(),
            });
            segments.push(match self.options.get("el") {
                Some(ProcessingOption::Enlarge(true)) => "1".to_string(),
                _ => "0".to_string(),
            });
        }
        segments.push(self.encoded_source());
        format!("/{}", segments.join("/"))
    }
}

impl fmt::Display for ImgproxyUrl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path();
        let signature = match &self.builder.signer {
            Some(signer) => signer.sign(&path),
            None => "insecure".to_string(),
        };
        write!(f, "{}/{}{}", self.builder.base, signature, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{KEY, SALT};

    const SOURCE: &str = "http://example.com/images/curiosity.jpg";
    const ENCODED: &str = "aHR0cDovL2V4YW1wbGUuY29tL2ltYWdlcy9jdXJpb3NpdHkuanBn";

    fn insecure() -> UrlBuilder {
        UrlBuilder::new(&ImgproxyConfig::new("https://img.example.com/")).unwrap()
    }

    #[test]
    fn missing_url_is_configuration_error() {
        for config in [
            ImgproxyConfig::default(),
            ImgproxyConfig::new(""),
            ImgproxyConfig::new("   "),
        ] {
            let err = UrlBuilder::new(&config).unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
            assert_eq!(err.to_string(), "An imgproxy instance URL is required.");
        }
    }

    #[test]
    fn bad_key_is_configuration_error() {
        let config = ImgproxyConfig::new("https://img.example.com").with_signing("zz", SALT);
        assert!(matches!(
            UrlBuilder::new(&config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn key_without_salt_is_insecure() {
        let mut config = ImgproxyConfig::new("https://img.example.com");
        config.key = Some(KEY.to_string());
        assert!(!UrlBuilder::new(&config).unwrap().is_signed());
    }

    #[test]
    fn advanced_insecure_url() {
        let builder = insecure();
        let mut url = builder.build(SOURCE, 800, 600);
        url.use_advanced_mode()
            .set_option(ProcessingOption::ResizingType("fill".into()))
            .set_option(ProcessingOption::Enlarge(true));

        assert_eq!(
            url.to_string(),
            format!("https://img.example.com/insecure/w:800/h:600/rt:fill/el:1/{ENCODED}")
        );
    }

    #[test]
    fn extension_follows_encoded_source() {
        let builder = insecure();
        let mut url = builder.build(SOURCE, 10, 20);
        url.use_advanced_mode().set_extension("webp");
        assert!(url.to_string().ends_with(&format!("/w:10/h:20/{ENCODED}.webp")));
    }

    #[test]
    fn basic_mode_uses_positional_segments() {
        let builder = insecure();
        let mut url = builder.build(SOURCE, 300, 200);
        assert_eq!(url.path(), format!("/fit/300/200/ce/0/{ENCODED}"));

        url.set_option(ProcessingOption::ResizingType("fill".into()))
            .set_option(ProcessingOption::Gravity(Gravity::Smart))
            .set_option(ProcessingOption::Enlarge(true))
            .set_extension("png");
        assert_eq!(url.path(), format!("/fill/300/200/sm/1/{ENCODED}.png"));
    }

    #[test]
    fn signed_url_replaces_insecure_marker() {
        let config = ImgproxyConfig::new("https://img.example.com").with_signing(KEY, SALT);
        let builder = UrlBuilder::new(&config).unwrap();
        let mut url = builder.build(SOURCE, 800, 600);
        url.use_advanced_mode();

        let rendered = url.to_string();
        let path = url.path();
        let signature = rendered
            .strip_prefix("https://img.example.com/")
            .and_then(|rest| rest.strip_suffix(path.as_str()))
            .unwrap();
        assert_ne!(signature, "insecure");
        assert_eq!(signature.len(), 43); // 32 bytes, base64url without padding
        assert!(!signature.contains('='));
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = ImgproxyConfig::new("https://img.example.com").with_signing(KEY, SALT);
        let builder = UrlBuilder::new(&config).unwrap();
        let render = || {
            let mut url = builder.build(SOURCE, 640, 480);
            url.use_advanced_mode()
                .set_option(ProcessingOption::Quality(80));
            url.to_string()
        };
        assert_eq!(render(), render());
    }
}
