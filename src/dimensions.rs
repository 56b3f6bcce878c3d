//! Target dimension resolution.
//!
//! Rules, first match wins:
//!
//! 1. `width` and `height` both given: used as-is.
//! 2. `ratio` + `width`: height follows from the ratio.
//! 3. `ratio` + `height`: width follows from the ratio.
//! 4. Otherwise the source dimensions are detected, and:
//!    - only `width`: height scales with the source aspect
//!    - only `height`: width scales with the source aspect
//!    - `ratio` alone: source width, height from the ratio
//!    - nothing: the source dimensions
//! 5. Detection came up empty: [`Error::Dimension`].
//!
//! Every derived value is rounded to whole pixels.

use crate::error::{Error, Result};
use crate::imaging::Dimensions;
use crate::params::Params;
use crate::ratio::{Ratio, round_px};

/// Dimension-relevant subset of a parameter map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Requested {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub ratio: Option<Ratio>,
}

impl Requested {
    /// Reads `width`, `height` and `ratio`. Malformed values are validation
    /// errors, not "absent".
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self {
            width: params.dimension("width")?,
            height: params.dimension("height")?,
            ratio: params.ratio("ratio")?,
        })
    }
}

/// Resolve the target size for `requested`.
///
/// `detect` is only called when rules 1-3 do not apply, at most once.
pub fn resolve_dimensions(
    requested: Requested,
    detect: impl FnOnce() -> Option<Dimensions>,
) -> Result<Dimensions> {
    let Requested {
        width,
        height,
        ratio,
    } = requested;

    match (width, height, ratio) {
        (Some(w), Some(h), _) => return Ok(Dimensions::new(w, h)),
        (Some(w), None, Some(r)) => return Ok(Dimensions::new(w, r.height_for(w as f64))),
        (None, Some(h), Some(r)) => return Ok(Dimensions::new(r.width_for(h as f64), h)),
        _ => {}
    }

    let source = detect().filter(|d| d.is_usable()).ok_or(Error::Dimension)?;
    let (src_w, src_h) = (source.width as f64, source.height as f64);

    Ok(match (width, height, ratio) {
        (Some(w), None, _) => Dimensions::new(w, round_px(src_h * w as f64 / src_w)),
        (None, Some(h), _) => Dimensions::new(round_px(src_w * h as f64 / src_h), h),
        (None, None, Some(r)) => Dimensions::new(source.width, r.height_for(src_w)),
        _ => source,
    })
}
