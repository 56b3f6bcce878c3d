//! imgproxy processing options.
//!
//! Each [`ProcessingOption`] renders as one path segment of an
//! advanced-mode URL, e.g. `rt:fill` or `pd:10:0:10:0`. The short codes are
//! imgproxy's own and must stay bit-exact: they are part of the signed path.

use std::fmt;
use std::mem::discriminant;

/// Crop anchor.
#[derive(Debug, Clone, PartialEq)]
pub enum Gravity {
    Center,
    Smart,
    /// Relative focal point, `0.0..=1.0` on both axes.
    FocusPoint { x: f64, y: f64 },
}

impl fmt::Display for Gravity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Center => f.write_str("ce"),
            Self::Smart => f.write_str("sm"),
            Self::FocusPoint { x, y } => write!(f, "fp:{x}:{y}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOption {
    ResizingType(String),
    /// Extend the canvas to the requested size (letterboxing).
    Extend,
    Gravity(Gravity),
    Quality(u32),
    Format(String),
    /// Background color as hex without `#`.
    Background(String),
    Enlarge(bool),
    PngInterlace,
    Dpr(f64),
    Blur(f64),
    Sharpen(f64),
    Pixelate(u32),
    AutoRotate,
    Rotate(i64),
    CacheBuster(String),
    Filename(String),
    /// `[top, right, bottom, left]`
    Padding([u32; 4]),
    Brightness(i64),
    Contrast(f64),
    Saturation(f64),
    Page(u32),
    ResizingAlgorithm(String),
}

impl ProcessingOption {
    /// imgproxy short code, the part before the first `:`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResizingType(_) => "rt",
            Self::Extend => "ex",
            Self::Gravity(_) => "g",
            Self::Quality(_) => "q",
            Self::Format(_) => "f",
            Self::Background(_) => "bg",
            Self::Enlarge(_) => "el",
            Self::PngInterlace => "png",
            Self::Dpr(_) => "dpr",
            Self::Blur(_) => "bl",
            Self::Sharpen(_) => "sh",
            Self::Pixelate(_) => "pix",
            Self::AutoRotate => "ar",
            Self::Rotate(_) => "rot",
            Self::CacheBuster(_) => "cb",
            Self::Filename(_) => "fn",
            Self::Padding(_) => "pd",
            Self::Brightness(_) => "br",
            Self::Contrast(_) => "co",
            Self::Saturation(_) => "sa",
            Self::Page(_) => "pg",
            Self::ResizingAlgorithm(_) => "ra",
        }
    }
}

impl fmt::Display for ProcessingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code();
        match self {
            Self::ResizingType(v)
            | Self::Format(v)
            | Self::Background(v)
            | Self::CacheBuster(v)
            | Self::Filename(v)
            | Self::ResizingAlgorithm(v) => write!(f, "{code}:{v}"),
            Self::Extend | Self::PngInterlace | Self::AutoRotate => write!(f, "{code}:1"),
            Self::Gravity(g) => write!(f, "{code}:{g}"),
            Self::Quality(v) | Self::Pixelate(v) | Self::Page(v) => write!(f, "{code}:{v}"),
            Self::Enlarge(v) => write!(f, "{code}:{}", u8::from(*v)),
            Self::Dpr(v) | Self::Blur(v) | Self::Sharpen(v) | Self::Contrast(v) | Self::Saturation(v) => {
                write!(f, "{code}:{v}")
            }
            Self::Rotate(v) | Self::Brightness(v) => write!(f, "{code}:{v}"),
            Self::Padding([t, r, b, l]) => write!(f, "{code}:{t}:{r}:{b}:{l}"),
        }
    }
}

/// Ordered option list with map semantics: setting an option that is
/// already present replaces it in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet(Vec<ProcessingOption>);

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, option: ProcessingOption) {
        match self
            .0
            .iter_mut()
            .find(|o| discriminant(*o) == discriminant(&option))
        {
            Some(existing) => *existing = option,
            None => self.0.push(option),
        }
    }

    /// Option with the given short code, if set.
    pub fn get(&self, code: &str) -> Option<&ProcessingOption> {
        self.0.iter().find(|o| o.code() == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessingOption> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rendered path segments, in insertion order.
    pub fn segments(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Extend<ProcessingOption> for OptionSet {
    fn extend<I: IntoIterator<Item = ProcessingOption>>(&mut self, iter: I) {
        for option in iter {
            self.set(option);
        }
    }
}
