//! Aspect-ratio expressions.
//!
//! Accepted forms:
//! - `"16:9"` or `"3/2"` — two numbers split on `/` (preferred when present) or `:`
//! - `"1.778"` — a single number, read as `1.778:1`
//!
//! Both components must be finite and strictly positive; anything else is
//! reported with the same error as a malformed expression.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// A width:height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio {
    pub width: f64,
    pub height: f64,
}

impl Ratio {
    /// Height matching `width` under this ratio, rounded to whole pixels.
    pub fn height_for(self, width: f64) -> u32 {
        round_px(width * self.height / self.width)
    }

    /// Width matching `height` under this ratio, rounded to whole pixels.
    pub fn width_for(self, height: f64) -> u32 {
        round_px(height * self.width / self.height)
    }
}

impl FromStr for Ratio {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let invalid = || {
            Error::validation(format!(
                "Invalid ratio `{value}`. Expected `16:9`, `3/2`, or a float like `1.778`."
            ))
        };

        let trimmed = value.trim();
        let (width, height) = if let Ok(n) = trimmed.parse::<f64>() {
            (n, 1.0)
        } else {
            let separator = if trimmed.contains('/') { '/' } else { ':' };
            let (w, h) = trimmed.split_once(separator).ok_or_else(invalid)?;
            let w = w.trim().parse::<f64>().map_err(|_| invalid())?;
            let h = h.trim().parse::<f64>().map_err(|_| invalid())?;
            (w, h)
        };

        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(invalid());
        }

        Ok(Ratio { width, height })
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Accepts either an expression string or a bare number.
impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }
        let text = match Repr::deserialize(deserializer)? {
            Repr::Number(n) => n.to_string(),
            Repr::Text(s) => s,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Round a computed dimension to whole pixels (half away from zero).
///
/// Every derived width or height in the crate goes through here, so the
/// ratio branches and the auto-detected branches agree.
pub(crate) fn round_px(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}
