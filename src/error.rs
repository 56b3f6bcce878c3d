//! Public error taxonomy.
//!
//! Every fallible public operation returns [`Error`]. Failures inside the
//! dimension-detection chain are not part of this type: each probe's
//! [`ProbeError`] is swallowed by the chain and only exhaustion of all probes
//! becomes [`Error::Dimension`].

use crate::imaging::ProbeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Required service configuration is missing. Raised before any other work.
    #[error("{0}")]
    Configuration(String),
    #[error("Image dimensions are missing and could not be auto-detected.")]
    Dimension,
    /// Malformed ratio, size descriptor, option value, or srcset precondition.
    #[error("{0}")]
    Validation(String),
    /// Retrieving a transformed image for a data URI failed.
    #[error("Failed to fetch transformed image: {0}")]
    Fetch(#[from] ProbeError),
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
