//! Image urls for assets stored in the content lake.
//!
//! Transformations are expressed as query parameters understood by the image
//! CDN; nothing is fetched or validated here beyond parsing the asset id.

use thiserror::Error;

use crate::config::SanityConfig;
use crate::content::{AssetSource, Crop, Hotspot, Image};

const CDN_BASE_URL: &str = "https://cdn.sanity.io";

#[derive(Debug, Error, PartialEq)]
pub enum ImageUrlError {
    #[error("image has no asset")]
    MissingAsset,
    #[error("malformed image asset reference: {0}")]
    InvalidReference(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageFormat {
    Jpg,
    Pjpg,
    Png,
    Webp,
}

impl ImageFormat {
    fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pjpg => "pjpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitMode {
    Clip,
    Crop,
    Fill,
    FillMax,
    Max,
    Scale,
    Min,
}

impl FitMode {
    fn as_str(&self) -> &'static str {
        match self {
            FitMode::Clip => "clip",
            FitMode::Crop => "crop",
            FitMode::Fill => "fill",
            FitMode::FillMax => "fillmax",
            FitMode::Max => "max",
            FitMode::Scale => "scale",
            FitMode::Min => "min",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CropMode {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    FocalPoint,
    Entropy,
}

impl CropMode {
    fn as_str(&self) -> &'static str {
        match self {
            CropMode::Top => "top",
            CropMode::Bottom => "bottom",
            CropMode::Left => "left",
            CropMode::Right => "right",
            CropMode::Center => "center",
            CropMode::FocalPoint => "focalpoint",
            CropMode::Entropy => "entropy",
        }
    }
}

/// Pixel rectangle of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Parsed `image-{id}-{width}x{height}-{format}` asset id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetId {
    pub fn parse(asset_id: &str) -> Result<AssetId, ImageUrlError> {
        let invalid = || ImageUrlError::InvalidReference(asset_id.to_string());

        let rest = asset_id.strip_prefix("image-").ok_or_else(invalid)?;
        let mut parts = rest.rsplitn(3, '-');
        let format = parts.next().ok_or_else(invalid)?;
        let dimensions = parts.next().ok_or_else(invalid)?;
        let id = parts.next().ok_or_else(invalid)?;

        let (width, height) = Self::parse_dimensions(dimensions).ok_or_else(invalid)?;
        if id.is_empty() || format.is_empty() {
            return Err(invalid());
        }

        Ok(AssetId { id: id.to_string(), width, height, format: format.to_string() })
    }

    /// Accepts a cdn url (`.../images/{project}/{dataset}/{id}-{w}x{h}.{ext}`).
    pub fn from_url(url: &str) -> Result<AssetId, ImageUrlError> {
        let invalid = || ImageUrlError::InvalidReference(url.to_string());

        let path = url.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.rsplit('/').next().ok_or_else(invalid)?;
        let (stem, format) = file_name.rsplit_once('.').ok_or_else(invalid)?;
        let (id, dimensions) = stem.rsplit_once('-').ok_or_else(invalid)?;

        Self::parse(&format!("image-{}-{}-{}", id, dimensions, format))
    }

    fn parse_dimensions(dimensions: &str) -> Option<(u32, u32)> {
        let (w, h) = dimensions.split_once('x')?;
        Some((w.parse().ok()?, h.parse().ok()?))
    }

    fn file_name(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.format)
    }
}

/// Entry point bound to a project and dataset; hands out builders.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUrls {
    project_id: String,
    dataset: String,
    base_url: String,
}

impl ImageUrls {
    pub fn new(config: &SanityConfig) -> Self {
        ImageUrls {
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            base_url: CDN_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn image<S: Into<ImageSource>>(&self, source: S) -> ImageUrlBuilder {
        ImageUrlBuilder {
            urls: self.clone(),
            source: source.into(),
            width: None,
            height: None,
            format: None,
            auto_format: false,
            quality: None,
            fit: None,
            crop: None,
            rect: None,
            dpr: None,
            blur: None,
            focal_point: None,
        }
    }
}

/// Anything an image url can be built from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    AssetId(String),
    Url(String),
    Image { asset: AssetSource, crop: Option<Crop>, hotspot: Option<Hotspot> },
    Missing,
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            ImageSource::Url(value.to_string())
        } else {
            ImageSource::AssetId(value.to_string())
        }
    }
}

impl From<&AssetSource> for ImageSource {
    fn from(value: &AssetSource) -> Self {
        ImageSource::Image { asset: value.clone(), crop: None, hotspot: None }
    }
}

impl From<&Image> for ImageSource {
    fn from(value: &Image) -> Self {
        match value.asset {
            Some(ref asset) => ImageSource::Image { asset: asset.clone(), crop: value.crop, hotspot: value.hotspot },
            None => ImageSource::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUrlBuilder {
    urls: ImageUrls,
    source: ImageSource,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<ImageFormat>,
    auto_format: bool,
    quality: Option<u8>,
    fit: Option<FitMode>,
    crop: Option<CropMode>,
    rect: Option<Rect>,
    dpr: Option<f64>,
    blur: Option<u32>,
    focal_point: Option<(f64, f64)>,
}

impl ImageUrlBuilder {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Let the cdn pick the best format the browser accepts.
    pub fn auto_format(mut self) -> Self {
        self.auto_format = true;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.min(100));
        self
    }

    pub fn fit(mut self, fit: FitMode) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn crop(mut self, crop: CropMode) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn rect(mut self, left: u32, top: u32, width: u32, height: u32) -> Self {
        self.rect = Some(Rect { left, top, width, height });
        self
    }

    pub fn dpr(mut self, dpr: f64) -> Self {
        self.dpr = Some(dpr);
        self
    }

    pub fn blur(mut self, blur: u32) -> Self {
        self.blur = Some(blur.clamp(1, 2000));
        self
    }

    /// Focal point as fractions of the image, used with [`CropMode::FocalPoint`].
    pub fn focal_point(mut self, x: f64, y: f64) -> Self {
        self.focal_point = Some((x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)));
        self
    }

    fn asset(&self) -> Result<AssetId, ImageUrlError> {
        match self.source {
            ImageSource::AssetId(ref id) => AssetId::parse(id),
            ImageSource::Url(ref url) => AssetId::from_url(url),
            ImageSource::Image { ref asset, .. } => match asset.url() {
                Some(url) => AssetId::from_url(url),
                None => AssetId::parse(asset.asset_id()),
            },
            ImageSource::Missing => Err(ImageUrlError::MissingAsset),
        }
    }

    /// The crop stored on the image, in pixels. `None` when nothing is cut.
    fn crop_rect(crop: &Crop, asset: &AssetId) -> Option<Rect> {
        if *crop == Crop::default() {
            return None;
        }
        let (w, h) = (asset.width as f64, asset.height as f64);
        let left = (crop.left * w).round();
        let top = (crop.top * h).round();
        let width = (w - crop.right * w - left).round().max(1.0);
        let height = (h - crop.bottom * h - top).round().max(1.0);
        Some(Rect { left: left as u32, top: top as u32, width: width as u32, height: height as u32 })
    }

    fn params(&self, asset: &AssetId) -> Vec<(&'static str, String)> {
        let (stored_crop, hotspot) = match self.source {
            ImageSource::Image { crop, hotspot, .. } => (crop, hotspot),
            _ => (None, None),
        };

        let rect = self.rect.or_else(|| stored_crop.and_then(|c| Self::crop_rect(&c, asset)));

        // The hotspot only matters when the output aspect ratio is forced
        let focal_point = self.focal_point.or_else(|| match (hotspot, self.width, self.height) {
            (Some(h), Some(_), Some(_)) if self.crop.is_none() => Some((h.x, h.y)),
            _ => None,
        });
        let crop = self.crop.or(focal_point.map(|_| CropMode::FocalPoint));

        let mut params = vec![];
        if let Some(r) = rect {
            params.push(("rect", format!("{},{},{},{}", r.left, r.top, r.width, r.height)));
        }
        if let Some((x, y)) = focal_point {
            params.push(("fp-x", x.to_string()));
            params.push(("fp-y", y.to_string()));
        }
        if let Some(format) = self.format {
            params.push(("fm", format.as_str().to_string()));
        }
        if let Some(w) = self.width {
            params.push(("w", w.to_string()));
        }
        if let Some(h) = self.height {
            params.push(("h", h.to_string()));
        }
        if let Some(q) = self.quality {
            params.push(("q", q.to_string()));
        }
        if let Some(fit) = self.fit {
            params.push(("fit", fit.as_str().to_string()));
        }
        if let Some(crop) = crop {
            params.push(("crop", crop.as_str().to_string()));
        }
        if self.auto_format {
            params.push(("auto", "format".to_string()));
        }
        if let Some(dpr) = self.dpr {
            params.push(("dpr", dpr.to_string()));
        }
        if let Some(blur) = self.blur {
            params.push(("blur", blur.to_string()));
        }
        params
    }

    pub fn url(&self) -> Result<String, ImageUrlError> {
        let asset = self.asset()?;
        let base = format!("{}/images/{}/{}/{}",
                           self.urls.base_url, self.urls.project_id, self.urls.dataset, asset.file_name());

        let params = self.params(&asset);
        if params.is_empty() {
            return Ok(base);
        }

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| ImageUrlError::InvalidReference(e.to_string()))?;
        Ok(format!("{}?{}", base, query))
    }
}

/// Builder for an image of the configured project.
pub fn url_for_image<S: Into<ImageSource>>(urls: &ImageUrls, source: S) -> ImageUrlBuilder {
    urls.image(source)
}
