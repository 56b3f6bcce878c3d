//! Transform sources.
//!
//! A transform is built from either a CMS-managed asset or a plain absolute
//! URL. The two variants expose different capabilities to the detection
//! chain: only assets carry cached dimensions, a focal point, and a readable
//! byte stream.

use crate::imaging::Dimensions;
use std::fmt;
use std::io::{self, Read};

/// Focal point in relative coordinates (`0.0..=1.0` on both axes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// A managed asset handle provided by the host CMS.
pub trait Asset {
    /// Public absolute URL the image service fetches the original from.
    fn url(&self) -> &str;

    /// Stored filename, used for the temp-file extension when downloading.
    fn filename(&self) -> &str;

    /// Width/height recorded by the CMS, if it has them.
    fn dimensions(&self) -> Option<Dimensions> {
        None
    }

    fn focal_point(&self) -> Option<FocalPoint> {
        None
    }

    /// Open a fresh stream over the asset's bytes.
    fn stream(&self) -> io::Result<Box<dyn Read + '_>>;
}

pub enum Source {
    Asset(Box<dyn Asset>),
    Url(String),
}

impl Source {
    pub fn asset(asset: impl Asset + 'static) -> Self {
        Self::Asset(Box::new(asset))
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Asset(asset) => asset.url(),
            Self::Url(url) => url,
        }
    }

    pub fn as_asset(&self) -> Option<&dyn Asset> {
        match self {
            Self::Asset(asset) => Some(asset.as_ref()),
            Self::Url(_) => None,
        }
    }

    pub fn focal_point(&self) -> Option<FocalPoint> {
        self.as_asset().and_then(|a| a.focal_point())
    }
}

impl From<String> for Source {
    fn from(url: String) -> Self {
        Self::Url(url)
    }
}

impl From<&str> for Source {
    fn from(url: &str) -> Self {
        Self::Url(url.to_string())
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset(asset) => f
                .debug_struct("Asset")
                .field("url", &asset.url())
                .field("filename", &asset.filename())
                .finish(),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}
