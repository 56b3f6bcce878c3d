//! Responsive variant planning for `srcset` attributes.
//!
//! A size list mixes two kinds of entries:
//!
//! - descriptor strings: `"2x"` (density multiplier) or `"1600w"` (absolute
//!   width)
//! - structured entries: `{"width": 400, "ratio": "1:1"}`, always emitted
//!   with a `w` descriptor
//!
//! Each entry becomes one [`Variant`]. The variant matching the transform's
//! own size (`"1x"`, or `"<base width>w"`) carries no descriptor, since the
//! implicit `srcset` candidate needs none.

use crate::dimensions::Requested;
use crate::error::{Error, Result};
use crate::imaging::Dimensions;
use crate::ratio::{Ratio, round_px};
use serde::Deserialize;
use std::str::FromStr;

/// One entry of a requested size list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SizeEntry {
    Descriptor(String),
    Width {
        width: u32,
        #[serde(default)]
        ratio: Option<Ratio>,
    },
}

impl SizeEntry {
    pub fn width(width: u32) -> Self {
        Self::Width { width, ratio: None }
    }

    pub fn width_with_ratio(width: u32, ratio: Ratio) -> Self {
        Self::Width {
            width,
            ratio: Some(ratio),
        }
    }
}

impl From<&str> for SizeEntry {
    fn from(descriptor: &str) -> Self {
        Self::Descriptor(descriptor.to_string())
    }
}

impl From<String> for SizeEntry {
    fn from(descriptor: String) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// A parsed descriptor string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor {
    Density(f64),
    Width(f64),
}

impl FromStr for Descriptor {
    type Err = Error;

    fn from_str(entry: &str) -> Result<Self> {
        let trimmed = entry.trim();
        let (value, unit) = match trimmed.char_indices().next_back() {
            Some((idx, unit @ ('x' | 'w'))) => (&trimmed[..idx], unit),
            _ => {
                return Err(Error::validation(format!(
                    "Size descriptor `{entry}` must end in `x` or `w`"
                )));
            }
        };
        let value: f64 = value
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite() && *v > 0.0)
            .ok_or_else(|| Error::validation(format!("Size value `{entry}` is not a number")))?;

        Ok(match unit {
            'x' => Descriptor::Density(value),
            _ => Descriptor::Width(value),
        })
    }
}

/// One resolved `srcset` candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub width: u32,
    pub height: u32,
    /// `None` for the base candidate.
    pub descriptor: Option<String>,
}

impl Variant {
    fn base(base: Dimensions) -> Self {
        Self {
            width: base.width,
            height: base.height,
            descriptor: None,
        }
    }

    pub fn is_base(&self) -> bool {
        self.descriptor.is_none()
    }
}

/// Resolve every entry of `sizes`, in input order.
///
/// `requested` is what the transform was constructed with and `base` what
/// it resolved to. The transform must have been given an explicit width or a
/// ratio.
pub fn plan_variants(requested: Requested, base: Dimensions, sizes: &[SizeEntry]) -> Result<Vec<Variant>> {
    if requested.width.is_none() && requested.ratio.is_none() {
        return Err(Error::validation(
            "Width or ratio must be specified before using srcset",
        ));
    }
    let ratio = requested.ratio;
    let scaled_height = |width: u32, ratio: Option<Ratio>| match ratio {
        Some(r) => r.height_for(width as f64),
        None => round_px(base.height as f64 * width as f64 / base.width as f64),
    };

    sizes
        .iter()
        .map(|entry| match entry {
            SizeEntry::Width {
                width,
                ratio: entry_ratio,
            } => Ok(Variant {
                width: *width,
                height: scaled_height(*width, entry_ratio.or(ratio)),
                descriptor: Some(format!("{width}w")),
            }),
            SizeEntry::Descriptor(text) => Ok(match text.parse::<Descriptor>()? {
                Descriptor::Density(m) if m == 1.0 => Variant::base(base),
                Descriptor::Density(m) => Variant {
                    width: round_px(base.width as f64 * m),
                    height: round_px(base.height as f64 * m),
                    descriptor: Some(format!("{m}x")),
                },
                Descriptor::Width(w) => {
                    let width = round_px(w);
                    if width == base.width {
                        Variant::base(base)
                    } else {
                        Variant {
                            width,
                            height: scaled_height(width, ratio),
                            descriptor: Some(format!("{width}w")),
                        }
                    }
                }
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn explicit(width: u32, height: u32) -> (Requested, Dimensions) {
        (
            Requested {
                width: Some(width),
                height: Some(height),
                ratio: None,
            },
            Dimensions::new(width, height),
        )
    }

    fn plan(requested: Requested, base: Dimensions, sizes: &[&str]) -> Vec<Variant> {
        let sizes: Vec<SizeEntry> = sizes.iter().copied().map(SizeEntry::from).collect();
        plan_variants(requested, base, &sizes).unwrap()
    }

    fn summary(variants: &[Variant]) -> Vec<(u32, u32, Option<&str>)> {
        variants
            .iter()
            .map(|v| (v.width, v.height, v.descriptor.as_deref()))
            .collect()
    }

    #[test]
    fn parse_descriptors() {
        assert_eq!("2x".parse::<Descriptor>().unwrap(), Descriptor::Density(2.0));
        assert_eq!("1.5x".parse::<Descriptor>().unwrap(), Descriptor::Density(1.5));
        assert_eq!("800w".parse::<Descriptor>().unwrap(), Descriptor::Width(800.0));
    }

    #[test]
    fn unknown_unit_names_the_entry() {
        let err = "800q".parse::<Descriptor>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "Size descriptor `800q` must end in `x` or `w`");
        assert!("800".parse::<Descriptor>().is_err());
        assert!("".parse::<Descriptor>().is_err());
    }

    #[test]
    fn non_numeric_value_names_the_entry() {
        let err = "bigw".parse::<Descriptor>().unwrap_err();
        assert_eq!(err.to_string(), "Size value `bigw` is not a number");
        assert!("x".parse::<Descriptor>().is_err());
        assert!("-2x".parse::<Descriptor>().is_err());
    }

    #[test]
    fn density_multipliers() {
        let (req, base) = explicit(800, 600);
        let variants = plan(req, base, &["1x", "2x", "3x"]);
        assert_eq!(
            summary(&variants),
            vec![(800, 600, None), (1600, 1200, Some("2x")), (2400, 1800, Some("3x"))]
        );
    }

    #[test]
    fn one_point_oh_is_base() {
        let (req, base) = explicit(800, 600);
        assert!(plan(req, base, &["1.0x"])[0].is_base());
    }

    #[test]
    fn fractional_density_rounds() {
        let (req, base) = explicit(333, 333);
        assert_eq!(
            summary(&plan(req, base, &["1.5x"])),
            vec![(500, 500, Some("1.5x"))]
        );
    }

    #[test]
    fn absolute_widths_scale_from_base_aspect() {
        let (req, base) = explicit(800, 600);
        let variants = plan(req, base, &["800w", "1600w", "2400w"]);
        assert_eq!(
            summary(&variants),
            vec![(800, 600, None), (1600, 1200, Some("1600w")), (2400, 1800, Some("2400w"))]
        );
    }

    #[test]
    fn absolute_widths_follow_transform_ratio() {
        let req = Requested {
            width: Some(800),
            height: None,
            ratio: Some("16:9".parse().unwrap()),
        };
        let base = Dimensions::new(800, 450);
        let variants = plan(req, base, &["800w", "1600w", "2400w"]);
        assert_eq!(
            summary(&variants),
            vec![(800, 450, None), (1600, 900, Some("1600w")), (2400, 1350, Some("2400w"))]
        );
    }

    #[test]
    fn structured_entries_always_carry_width_descriptor() {
        let (req, base) = explicit(800, 600);
        let sizes = [SizeEntry::width(800), SizeEntry::width(400)];
        let variants = plan_variants(req, base, &sizes).unwrap();
        assert_eq!(
            summary(&variants),
            vec![(800, 600, Some("800w")), (400, 300, Some("400w"))]
        );
    }

    #[test]
    fn structured_entry_ratio_overrides_transform_ratio() {
        let req = Requested {
            width: Some(800),
            height: None,
            ratio: Some("16:9".parse().unwrap()),
        };
        let sizes = [
            SizeEntry::width_with_ratio(400, "1:1".parse().unwrap()),
            SizeEntry::width(400),
        ];
        let variants = plan_variants(req, Dimensions::new(800, 450), &sizes).unwrap();
        assert_eq!(summary(&variants), vec![(400, 400, Some("400w")), (400, 225, Some("400w"))]);
    }

    #[test]
    fn size_lists_deserialize_from_mixed_json() {
        let sizes: Vec<SizeEntry> =
            serde_json::from_value(json!(["2x", {"width": 300}, {"width": 300, "ratio": "4:3"}])).unwrap();
        assert_eq!(sizes[0], SizeEntry::from("2x"));
        assert_eq!(sizes[1], SizeEntry::width(300));
        assert_eq!(sizes[2], SizeEntry::width_with_ratio(300, "4:3".parse().unwrap()));
    }

    #[test]
    fn requires_width_or_ratio() {
        let req = Requested {
            width: None,
            height: Some(600),
            ratio: None,
        };
        let err = plan_variants(req, Dimensions::new(800, 600), &[SizeEntry::from("2x")]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.to_string(), "Width or ratio must be specified before using srcset");
    }

    #[test]
    fn ratio_alone_satisfies_precondition() {
        let req = Requested {
            width: None,
            height: None,
            ratio: Some("1:1".parse().unwrap()),
        };
        let variants = plan(req, Dimensions::new(500, 500), &["2x"]);
        assert_eq!(summary(&variants), vec![(1000, 1000, Some("2x"))]);
    }

    #[test]
    fn bad_entry_fails_whole_plan() {
        let (req, base) = explicit(800, 600);
        let sizes: Vec<SizeEntry> = ["1x", "800q"].into_iter().map(SizeEntry::from).collect();
        assert!(plan_variants(req, base, &sizes).is_err());
    }
}
