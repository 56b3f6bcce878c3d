//! CMS parameter vocabulary → imgproxy processing options.
//!
//! | Parameter | Option | Notes |
//! |---|---|---|
//! | `quality` | `q` | falls back to the configured default quality |
//! | `format`, `extension` | `f` + URL extension | extension defaults to the format |
//! | `mode` | `rt` (+ `ex`) | `crop→fill`, `fit→fit`, `stretch→force`, `letterbox→fit` + extend; other values pass through; default `crop` |
//! | *(asset focal point)* | `g:fp:x:y` | otherwise imgproxy's default gravity |
//! | `fill` | `bg` | leading `#` stripped |
//! | `upscale` | `el:1` | unless explicitly falsy; then no `el` segment |
//! | `interlace` | `png:1` | any non-null value, even `false` |
//! | `dpr`, `blur`, `sharpen`, `pixelate`, `rotate` | `dpr`, `bl`, `sh`, `pix`, `rot` | |
//! | `autoRotate` | `ar:1` | any alias spelling, see [`Params::normalized`] |
//! | `cacheBuster` | `cb` | either spelling alone is enough |
//! | `filename` | `fn` | |
//! | `padding` | `pd` | `[top, right, bottom, left]` |
//! | `brightness`, `contrast`, `saturation`, `page` | `br`, `co`, `sa`, `pg` | |
//! | `resizingAlgorithm` | `ra` | |
//!
//! Unrecognized keys are ignored.

use crate::error::{Error, Result};
use crate::params::Params;
use crate::source::FocalPoint;
use crate::url::{Gravity, ImgproxyUrl, OptionSet, ProcessingOption};

const DEFAULT_MODE: &str = "crop";

/// Inputs to translation that come from outside the parameter map.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranslateContext {
    pub default_quality: Option<u32>,
    pub focal_point: Option<FocalPoint>,
}

/// Result of translating one merged parameter map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub options: OptionSet,
    pub extension: Option<String>,
}

impl Translation {
    /// Attach every option (and the extension, if any) to `url`.
    pub fn apply(self, url: &mut ImgproxyUrl<'_>) {
        for option in self.options.iter() {
            url.set_option(option.clone());
        }
        if let Some(ext) = self.extension {
            url.set_extension(ext);
        }
    }
}

/// Translate `params` into an option set.
///
/// `params` should already be the merged map (construction-time params
/// overlaid with call-time params).
pub fn translate(params: &Params, ctx: TranslateContext) -> Result<Translation> {
    let params = params.normalized();
    let mut options = OptionSet::new();
    let mut extension = None;

    let quality = match params.integer("quality")? {
        Some(q) => Some(unsigned("quality", q)?),
        None => ctx.default_quality,
    };
    if let Some(q) = quality {
        options.set(ProcessingOption::Quality(q));
    }

    if let Some(format) = params.string("format") {
        extension = Some(params.string("extension").unwrap_or_else(|| format.clone()));
        options.set(ProcessingOption::Format(format));
    }

    let mode = params
        .string("mode")
        .unwrap_or_else(|| DEFAULT_MODE.to_string());
    let resizing_type = match mode.as_str() {
        "crop" => "fill",
        "fit" => "fit",
        "stretch" => "force",
        "letterbox" => {
            options.set(ProcessingOption::Extend);
            "fit"
        }
        // imgproxy's own types (`fill-down`, `auto`, ...) pass through
        other => other,
    };
    options.set(ProcessingOption::ResizingType(resizing_type.to_string()));

    if let Some(FocalPoint { x, y }) = ctx.focal_point {
        options.set(ProcessingOption::Gravity(Gravity::FocusPoint { x, y }));
    }

    if let Some(fill) = params.string("fill") {
        options.set(ProcessingOption::Background(
            fill.trim_matches('#').to_string(),
        ));
    }

    if !params.contains("upscale") || params.is_truthy("upscale") {
        options.set(ProcessingOption::Enlarge(true));
    }

    if params.contains("interlace") {
        options.set(ProcessingOption::PngInterlace);
    }

    if let Some(dpr) = params.number("dpr")? {
        options.set(ProcessingOption::Dpr(dpr));
    }
    if let Some(blur) = params.number("blur")? {
        options.set(ProcessingOption::Blur(blur));
    }
    if let Some(sharpen) = params.number("sharpen")? {
        options.set(ProcessingOption::Sharpen(sharpen));
    }
    if let Some(pixelate) = params.integer("pixelate")? {
        options.set(ProcessingOption::Pixelate(unsigned("pixelate", pixelate)?));
    }

    if params.is_truthy("autoRotate") {
        options.set(ProcessingOption::AutoRotate);
    }

    if let Some(rotate) = params.integer("rotate")? {
        options.set(ProcessingOption::Rotate(rotate));
    }

    if params.is_truthy("cacheBuster")
        && let Some(cb) = params.string("cacheBuster")
    {
        options.set(ProcessingOption::CacheBuster(cb));
    }

    if let Some(filename) = params.string("filename") {
        options.set(ProcessingOption::Filename(filename));
    }

    if let Some(padding) = params.numbers("padding")? {
        options.set(ProcessingOption::Padding(padding_sides(&padding)?));
    }

    if let Some(brightness) = params.integer("brightness")? {
        options.set(ProcessingOption::Brightness(brightness));
    }
    if let Some(contrast) = params.number("contrast")? {
        options.set(ProcessingOption::Contrast(contrast));
    }
    if let Some(saturation) = params.number("saturation")? {
        options.set(ProcessingOption::Saturation(saturation));
    }
    if let Some(page) = params.integer("page")? {
        options.set(ProcessingOption::Page(unsigned("page", page)?));
    }

    if params.is_truthy("resizingAlgorithm")
        && let Some(algorithm) = params.string("resizingAlgorithm")
    {
        options.set(ProcessingOption::ResizingAlgorithm(algorithm));
    }

    Ok(Translation { options, extension })
}

fn unsigned(key: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::validation(format!("Option `{key}` must be a non-negative integer, got `{value}`"))
    })
}

fn padding_sides(values: &[f64]) -> Result<[u32; 4]> {
    let sides: [f64; 4] = values.try_into().map_err(|_| {
        Error::validation(format!(
            "Option `padding` expects four values `[top, right, bottom, left]`, got {}",
            values.len()
        ))
    })?;
    let mut out = [0u32; 4];
    for (slot, side) in out.iter_mut().zip(sides) {
        *slot = unsigned("padding", side.round() as i64)?;
    }
    Ok(out)
}
