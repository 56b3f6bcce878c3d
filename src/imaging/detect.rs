//! Source dimension detection.
//!
//! Detection is an ordered chain of probes. Each probe either reports
//! dimensions, declares itself not applicable to the source, or fails; the
//! first usable result wins and later probes never run. Failures are logged
//! at `debug` level and otherwise swallowed.
//!
//! | # | Step | Applies to | Cost |
//! |---|---|---|---|
//! | 1 | `asset-metadata` | assets | none (cached by the CMS) |
//! | 2 | `asset-stream` | assets | reads the stream head |
//! | 3 | `url-header` | both | ranged GET of the first 64 KiB |
//! | 4 | `url-decode` | both | full GET + decode (`full-decode` feature) |
//! | 5 | `asset-download` | assets | copies the stream to a temp file |
//!
//! Steps run strictly one after another: every step after the first pays
//! network or disk latency, which is only worth it when the cheaper ones
//! came up empty.

use super::backend::{Dimensions, Fetcher, ProbeError};
use super::identify::{identify_file, sniff_dimensions};
use crate::source::Source;
use std::io::{Read, Write};
use std::path::Path;

/// Bytes read from a stream or URL for header sniffing.
pub const HEADER_BYTES: u64 = 64 * 1024;

/// `Ok(None)` means the probe does not apply to this source.
pub type Probe = fn(&Source, &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError>;

#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub probe: Probe,
}

/// The production chain, in order.
pub fn detection_chain() -> Vec<Step> {
    let mut chain = vec![
        Step {
            name: "asset-metadata",
            probe: asset_metadata,
        },
        Step {
            name: "asset-stream",
            probe: asset_stream,
        },
        Step {
            name: "url-header",
            probe: url_header,
        },
    ];
    #[cfg(feature = "full-decode")]
    chain.push(Step {
        name: "url-decode",
        probe: url_decode,
    });
    chain.push(Step {
        name: "asset-download",
        probe: asset_download,
    });
    chain
}

/// Run the production chain against `source`.
pub fn detect_dimensions(source: &Source, fetcher: &dyn Fetcher) -> Option<Dimensions> {
    run_chain(&detection_chain(), source, fetcher)
}

/// Run `steps` in order and return the first usable result.
pub fn run_chain(steps: &[Step], source: &Source, fetcher: &dyn Fetcher) -> Option<Dimensions> {
    for step in steps {
        match (step.probe)(source, fetcher) {
            Ok(Some(dims)) if dims.is_usable() => {
                tracing::debug!(step = step.name, width = dims.width, height = dims.height, "detected source dimensions");
                return Some(dims);
            }
            Ok(Some(dims)) => {
                tracing::debug!(step = step.name, width = dims.width, height = dims.height, "ignoring zero-sized dimensions");
            }
            Ok(None) => {}
            Err(err) => {
                tracing::debug!(step = step.name, url = source.url(), error = %err, "dimension probe failed");
            }
        }
    }
    None
}

fn asset_metadata(source: &Source, _: &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError> {
    Ok(source.as_asset().and_then(|asset| asset.dimensions()))
}

fn asset_stream(source: &Source, _: &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError> {
    let Some(asset) = source.as_asset() else {
        return Ok(None);
    };
    let mut head = Vec::new();
    asset.stream()?.take(HEADER_BYTES).read_to_end(&mut head)?;
    sniff_dimensions(&head).map(Some)
}

fn url_header(source: &Source, fetcher: &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError> {
    let head = fetcher.fetch_prefix(source.url(), HEADER_BYTES)?;
    sniff_dimensions(&head).map(Some)
}

#[cfg(feature = "full-decode")]
fn url_decode(source: &Source, fetcher: &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError> {
    let body = fetcher.fetch(source.url())?;
    super::identify::decode_dimensions(&body).map(Some)
}

fn asset_download(source: &Source, _: &dyn Fetcher) -> Result<Option<Dimensions>, ProbeError> {
    let Some(asset) = source.as_asset() else {
        return Ok(None);
    };
    let suffix = Path::new(asset.filename())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let mut file = tempfile::Builder::new()
        .prefix("imgproxy-")
        .suffix(&suffix)
        .tempfile()?;
    std::io::copy(&mut asset.stream()?, &mut file)?;
    file.flush()?;
    identify_file(file.path()).map(Some)
}
