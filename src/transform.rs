//! Resolved rendering requests.
//!
//! A [`Transform`] pairs a source with its construction-time parameters and
//! the target size resolved from them. The size is fixed at construction;
//! [`Transform::url`] may override `width`/`height` for one call, but never
//! writes the override back.

use crate::config::ImgproxyConfig;
use crate::dimensions::{Requested, resolve_dimensions};
use crate::error::Result;
use crate::imaging::{Dimensions, Fetcher, HttpFetcher, detect_dimensions};
use crate::params::Params;
use crate::source::Source;
use crate::srcset::{SizeEntry, plan_variants};
use crate::translate::{TranslateContext, translate};
use crate::url::{ImgproxyUrl, UrlBuilder};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::sync::Arc;

const DEFAULT_DATA_URI_FORMAT: &str = "jpg";

pub struct Transform {
    source: Source,
    params: Params,
    requested: Requested,
    dimensions: Dimensions,
    builder: UrlBuilder,
    default_quality: Option<u32>,
    fetcher: Arc<dyn Fetcher>,
}

impl Transform {
    /// Resolve `source` + `params` against `config`, detecting source
    /// dimensions over HTTP when needed.
    pub fn new(source: impl Into<Source>, params: Params, config: &ImgproxyConfig) -> Result<Self> {
        Self::with_fetcher(source, params, config, Arc::new(HttpFetcher::new()))
    }

    /// Like [`Transform::new`], with an explicit fetcher for detection and
    /// data URIs.
    ///
    /// The URL builder is created first, so a missing instance URL fails
    /// before any detection I/O.
    pub fn with_fetcher(
        source: impl Into<Source>,
        params: Params,
        config: &ImgproxyConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        let source = source.into();
        let builder = UrlBuilder::new(config)?;
        let requested = Requested::from_params(&params)?;
        let dimensions = resolve_dimensions(requested, || detect_dimensions(&source, fetcher.as_ref()))?;

        Ok(Self {
            source,
            params,
            requested,
            dimensions,
            builder,
            default_quality: config.default_quality,
            fetcher,
        })
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Build the advanced-mode URL for `params` merged over the construction
    /// params. `width`/`height` in `params` override the resolved size for
    /// this call only.
    pub fn transform(&self, params: &Params) -> Result<ImgproxyUrl<'_>> {
        let merged = self.params.merged(params);
        let width = merged.dimension("width")?.unwrap_or(self.dimensions.width);
        let height = merged.dimension("height")?.unwrap_or(self.dimensions.height);

        let translation = translate(
            &merged,
            TranslateContext {
                default_quality: self.default_quality,
                focal_point: self.source.focal_point(),
            },
        )?;

        let mut url = self.builder.build(self.source.url(), width, height);
        url.use_advanced_mode();
        translation.apply(&mut url);
        Ok(url)
    }

    pub fn url(&self, params: &Params) -> Result<String> {
        let url = self.transform(params)?.to_string();
        tracing::trace!(source = self.source.url(), url = %url, "rendered imgproxy url");
        Ok(url)
    }

    /// Comma-joined `srcset` value, one candidate per entry of `sizes`.
    pub fn srcset(&self, sizes: &[SizeEntry]) -> Result<String> {
        let candidates = plan_variants(self.requested, self.dimensions, sizes)?
            .into_iter()
            .map(|variant| match variant.descriptor {
                None => self.url(&Params::new()),
                Some(descriptor) => {
                    let overrides = Params::new()
                        .with("width", variant.width)
                        .with("height", variant.height);
                    Ok(format!("{} {descriptor}", self.url(&overrides)?))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(candidates.join(", "))
    }

    /// Fetch the transformed image and inline it as
    /// `data:image/<format>;base64,<payload>`.
    ///
    /// `<format>` is the `format` param (call, then construction), or `jpg`.
    pub fn data_uri(&self, params: &Params) -> Result<String> {
        let url = self.url(params)?;
        let body = self.fetcher.fetch(&url)?;
        let format = self
            .params
            .merged(params)
            .string("format")
            .unwrap_or_else(|| DEFAULT_DATA_URI_FORMAT.to_string());
        Ok(format!("data:image/{format};base64,{}", STANDARD.encode(body)))
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("source", &self.source)
            .field("params", &self.params)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

/// Entry point for templating layers: one configured imgproxy instance.
#[derive(Clone)]
pub struct Imgproxy {
    config: ImgproxyConfig,
    fetcher: Arc<dyn Fetcher>,
}

impl Imgproxy {
    pub fn new(config: ImgproxyConfig) -> Self {
        Self {
            config,
            fetcher: Arc::new(HttpFetcher::new()),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn config(&self) -> &ImgproxyConfig {
        &self.config
    }

    pub fn builder(&self) -> Result<UrlBuilder> {
        UrlBuilder::new(&self.config)
    }

    pub fn transform(&self, source: impl Into<Source>, params: Params) -> Result<Transform> {
        Transform::with_fetcher(source, params, &self.config, Arc::clone(&self.fetcher))
    }
}
