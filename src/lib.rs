//! # imgproxy-transform
//!
//! Resolves what an image rendering request actually asks for (target size,
//! crop mode, quality, format, effects) and encodes it as a signed
//! [imgproxy](https://imgproxy.net) URL. Templating layers use it to emit
//! `src` and `srcset` values without knowing imgproxy's option vocabulary or
//! how to find out how big a source image is.
//!
//! ```no_run
//! use imgproxy_transform::{Imgproxy, ImgproxyConfig, Params, SizeEntry};
//!
//! let service = Imgproxy::new(ImgproxyConfig::from_env()?);
//! let hero = service.transform(
//!     "https://cdn.example.com/hero.jpg",
//!     Params::new().with("width", 800).with("ratio", "16:9"),
//! )?;
//!
//! let src = hero.url(&Params::new())?;
//! let srcset = hero.srcset(&["1x".into(), "2x".into(), SizeEntry::width(400)])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! construction   params ──► dimensions ──► (width, height)     fixed for the Transform's life
//!                              │
//!                              └─ imaging::detect when a side is unknown
//!
//! url(params)    params ⊕ call params ──► translate ──► OptionSet ──► url::ImgproxyUrl ──► String
//!
//! srcset(sizes)  sizes ──► srcset::plan_variants ──► one url() per variant ──► "a, b 2x, c 3x"
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`transform`] | [`Transform`] orchestrator and the [`Imgproxy`] service |
//! | [`dimensions`] | Target size from explicit values, ratios, or detected source size |
//! | [`translate`] | CMS parameter vocabulary → imgproxy processing options |
//! | [`srcset`] | Size descriptors (`2x`, `800w`, `{width, ratio}`) → variants |
//! | [`url`] | imgproxy URL assembly, option codes, HMAC signing |
//! | [`params`] | Loosely-typed parameter map with template truthiness and alias folding |
//! | [`ratio`] | `16:9` / `3/2` / `1.778` aspect-ratio parsing |
//! | [`source`] | Managed assets vs. plain URLs |
//! | [`imaging`] | Source dimension probing: header sniffing, HTTP, fallback chain |
//! | [`config`] | `imgproxy.toml` + environment configuration |
//! | [`error`] | Public error taxonomy |
//!
//! # Design Decisions
//!
//! ## Dimensions Are Resolved Once
//!
//! A [`Transform`] resolves its width and height at construction, probing the
//! source only when a side is missing. Later calls can override the size for
//! a single URL (that is how `srcset` variants are built) but the stored pair
//! never changes, so repeated calls with the same params render the same URL.
//!
//! ## Detection Is a Flat Chain
//!
//! Source probing is an ordered list of probe functions, cheapest first:
//! cached CMS metadata, the asset's stream head, a ranged GET of the remote
//! header, a full download and decode (`full-decode` feature), and a temp-file
//! download. Probe failures are logged at `debug` and skipped; only running
//! out of probes is an error.
//!
//! ## Configuration Is Injected
//!
//! Nothing reads the environment behind the caller's back.
//! [`ImgproxyConfig`] is an explicit value; [`ImgproxyConfig::from_env`] and
//! [`config::load_config`] are conveniences for building one.
//!
//! ## Rounding
//!
//! Every derived dimension is rounded to the nearest pixel, half away from
//! zero. `3/2` at 800 wide is 533 tall, whether the height came from a ratio
//! or from the detected source aspect.

pub mod config;
pub mod dimensions;
pub mod error;
pub mod imaging;
pub mod params;
pub mod ratio;
pub mod source;
pub mod srcset;
pub mod transform;
pub mod translate;
pub mod url;

pub use config::ImgproxyConfig;
pub use error::{Error, Result};
pub use params::Params;
pub use ratio::Ratio;
pub use source::{Asset, FocalPoint, Source};
pub use srcset::SizeEntry;
pub use transform::{Imgproxy, Transform};
pub use url::UrlBuilder;

#[cfg(test)]
pub(crate) mod test_helpers;
