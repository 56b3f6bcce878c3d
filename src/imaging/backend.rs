//! Remote access trait and shared probe types.
//!
//! The [`Fetcher`] trait covers the two network operations the crate needs:
//! reading the head of a remote image (header sniffing) and downloading a
//! whole response (full decodes, data URIs).
//!
//! The production implementation is [`HttpFetcher`](super::http::HttpFetcher),
//! a blocking `ureq` agent. Tests use the recording mock in [`tests`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Pixel dimensions of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides non-zero. Zero-sized results count as "not detected".
    pub fn is_usable(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Blocking access to remote images.
///
/// Calls run to completion; there is no timeout or retry at this layer.
pub trait Fetcher {
    /// Read at most `max_bytes` from the start of the resource.
    fn fetch_prefix(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>, ProbeError>;

    /// Download the whole resource.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ProbeError>;
}
