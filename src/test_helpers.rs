//! Shared test utilities.
//!
//! - [`MockAsset`]: an in-memory [`Asset`] with optional cached dimensions,
//!   focal point, and stream bodies.
//! - [`png_bytes`] / [`jpeg_bytes`]: synthesized images, so no binary
//!   fixtures are checked in.
//! - [`KEY`] / [`SALT`]: the signing pair from imgproxy's documentation.
//!
//! Remote access is mocked by `imaging::backend::tests::MockFetcher`.

use crate::imaging::Dimensions;
use crate::source::{Asset, FocalPoint};
use image::{ImageEncoder, RgbImage};
use std::cell::Cell;
use std::io::{self, Cursor, Read};

pub const KEY: &str = "943b421c9eb07c830af81030552c86009268de4e532ba2ee2eab8247c6da0881";
pub const SALT: &str = "520f986b998545b4785e0defbc4f3c1203f22de2374a3d53cb7a7fe9fea309c5";

// =========================================================================
// Assets
// =========================================================================

/// In-memory asset.
///
/// Successive `stream()` calls hand out successive bodies; the last body
/// repeats. An asset without bodies fails to open a stream.
#[derive(Debug, Default)]
pub struct MockAsset {
    url: String,
    filename: String,
    dimensions: Option<Dimensions>,
    focal_point: Option<FocalPoint>,
    streams: Vec<Vec<u8>>,
    opened: Cell<usize>,
}

impl MockAsset {
    pub fn new(url: &str, filename: &str) -> Self {
        Self {
            url: url.to_string(),
            filename: filename.to_string(),
            ..Default::default()
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    pub fn with_focal_point(mut self, x: f64, y: f64) -> Self {
        self.focal_point = Some(FocalPoint { x, y });
        self
    }

    pub fn with_bytes(self, bytes: Vec<u8>) -> Self {
        self.with_streams(vec![bytes])
    }

    pub fn with_streams(mut self, streams: Vec<Vec<u8>>) -> Self {
        self.streams = streams;
        self
    }

    /// Number of `stream()` calls so far.
    pub fn open_count(&self) -> usize {
        self.opened.get()
    }
}

impl Asset for MockAsset {
    fn url(&self) -> &str {
        &self.url
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    fn focal_point(&self) -> Option<FocalPoint> {
        self.focal_point
    }

    fn stream(&self) -> io::Result<Box<dyn Read + '_>> {
        let n = self.opened.get();
        self.opened.set(n + 1);
        let body = self
            .streams
            .get(n)
            .or_else(|| self.streams.last())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "asset has no stream"))?;
        Ok(Box::new(Cursor::new(body.as_slice())))
    }
}

// =========================================================================
// Synthesized images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

#[test]
fn mock_asset_streams_in_order_then_repeats() {
    let asset = MockAsset::new("u", "f.png").with_streams(vec![b"a".to_vec(), b"b".to_vec()]);
    let read = |asset: &MockAsset| {
        let mut s = String::new();
        asset.stream().unwrap().read_to_string(&mut s).unwrap();
        s
    };
    assert_eq!(read(&asset), "a");
    assert_eq!(read(&asset), "b");
    assert_eq!(read(&asset), "b");
    assert_eq!(asset.open_count(), 3);
    assert!(MockAsset::new("u", "f").stream().is_err());
}
