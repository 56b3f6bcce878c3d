//! Dimension identification from bytes and files.
//!
//! ## Crate mapping
//!
//! | Input | Crate / function |
//! |---|---|
//! | Header bytes (JPEG, PNG, GIF, TIFF, WebP) | `image::ImageReader::into_dimensions` (header only) |
//! | AVIF container | `avif-parse` primary item metadata |
//! | File on disk | `image::image_dimensions`, or `avif-parse` for `.avif` |
//! | Full decode | `image::load_from_memory` (`full-decode` feature) |

use super::backend::{Dimensions, ProbeError};
use image::ImageReader;
use std::io::Cursor;
use std::path::Path;

/// AVIF `ftyp` major brands.
const AVIF_BRANDS: &[&[u8; 4]] = &[b"avif", b"avis"];

fn is_avif_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("avif"))
}

fn is_avif_bytes(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[4..8] == b"ftyp" && AVIF_BRANDS.iter().any(|b| &bytes[8..12] == *b)
}

/// Extract dimensions from an AVIF container (no AV1 decode needed).
fn identify_avif(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let avif = avif_parse::read_avif(&mut Cursor::new(bytes))
        .map_err(|e| ProbeError::Decode(format!("Failed to parse AVIF: {e:?}")))?;
    let meta = avif
        .primary_item_metadata()
        .map_err(|e| ProbeError::Decode(format!("Failed to read AVIF metadata: {e:?}")))?;
    Ok(Dimensions {
        width: meta.max_frame_width.get(),
        height: meta.max_frame_height.get(),
    })
}

/// Read dimensions from the leading bytes of an image.
///
/// Only the header is parsed, so a truncated download is fine as long as it
/// covers the format's size fields.
pub fn sniff_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    if is_avif_bytes(bytes) {
        return identify_avif(bytes);
    }
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| ProbeError::Decode(format!("Failed to read dimensions: {e}")))?;
    Ok(Dimensions { width, height })
}

/// Read dimensions of an image file on disk.
pub fn identify_file(path: &Path) -> Result<Dimensions, ProbeError> {
    if is_avif_path(path) {
        let bytes = std::fs::read(path)?;
        return identify_avif(&bytes);
    }
    let (width, height) = image::image_dimensions(path).map_err(|e| {
        ProbeError::Decode(format!(
            "Failed to read dimensions of {}: {e}",
            path.display()
        ))
    })?;
    Ok(Dimensions { width, height })
}

/// Fully decode an image and report the decoded size.
#[cfg(feature = "full-decode")]
pub fn decode_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| ProbeError::Decode(format!("Failed to decode image: {e}")))?;
    Ok(Dimensions {
        width: img.width(),
        height: img.height(),
    })
}
