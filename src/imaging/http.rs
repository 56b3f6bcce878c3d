//! Blocking HTTP fetcher on `ureq`.

use super::backend::{Fetcher, ProbeError};
use std::io::Read;

const DEFAULT_USER_AGENT: &str = concat!("imgproxy-transform/", env!("CARGO_PKG_VERSION"));

/// Largest body [`HttpFetcher::fetch`] accepts (50 MiB).
const DEFAULT_MAX_SIZE: u64 = 50 * 1024 * 1024;

/// [`Fetcher`] backed by a shared `ureq` agent.
///
/// Redirects are followed by the agent; non-2xx statuses are errors.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
    max_size: u64,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::config_builder().build().into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the maximum full-download size in bytes.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn http_error(url: &str, err: ureq::Error) -> ProbeError {
    ProbeError::Http(format!("{url}: {err}"))
}

impl Fetcher for HttpFetcher {
    fn fetch_prefix(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>, ProbeError> {
        let range = format!("bytes=0-{}", max_bytes.saturating_sub(1));
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Range", &range)
            .call()
            .map_err(|e| http_error(url, e))?;

        // Servers may ignore Range and send the whole body; stop reading early.
        let mut buf = Vec::new();
        response
            .body_mut()
            .as_reader()
            .take(max_bytes)
            .read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ProbeError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| http_error(url, e))?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_size)
            .read_to_vec()
            .map_err(|e| http_error(url, e))
    }
}
