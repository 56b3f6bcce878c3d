//! Source image inspection — dimensions only, never pixels out.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** header bytes | `image::ImageReader::into_dimensions`, `avif-parse` |
//! | **Identify** a file | `image::image_dimensions` |
//! | **Decode** fallback | `image::load_from_memory` |
//! | **Fetch** remote bytes | `ureq` |
//!
//! The module is split into:
//! - **Backend**: [`Fetcher`] trait, [`Dimensions`], [`ProbeError`]
//! - **HTTP**: [`HttpFetcher`], the production [`Fetcher`]
//! - **Identify**: pure byte/file dimension readers
//! - **Detect**: the ordered fallback chain used when a transform is missing
//!   a width or height

pub mod backend;
pub mod detect;
pub mod http;
mod identify;

pub use backend::{Dimensions, Fetcher, ProbeError};
pub use detect::{Probe, Step, detect_dimensions, detection_chain, run_chain};
pub use http::HttpFetcher;
pub use identify::{identify_file, sniff_dimensions};
