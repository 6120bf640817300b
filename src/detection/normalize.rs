use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{DetectionError, Result};

/// Media type every normalized payload ends up in.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// JPEG quality for uploaded or converted stills.
const STILL_QUALITY: u8 = 90;
/// JPEG quality for live camera frames.
const FRAME_QUALITY: u8 = 85;

/// An input image as handed over by the caller: raw bytes plus whatever
/// type information came with them.
#[derive(Debug, Clone, Default)]
pub struct RawImage {
    pub data: Vec<u8>,
    pub media_type: Option<String>,
    pub file_name: Option<String>,
}

impl RawImage {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            data,
            media_type: None,
            file_name: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Declared or sniffed HEIC/HEIF container.
    fn is_heic(&self) -> bool {
        if let Some(media_type) = &self.media_type {
            if media_type == "image/heic" || media_type == "image/heif" {
                return true;
            }
        }
        if let Some(name) = &self.file_name {
            let name = name.to_ascii_lowercase();
            if name.ends_with(".heic") || name.ends_with(".heif") {
                return true;
            }
        }
        has_heif_brand(&self.data)
    }

    /// Declared JPEG, or sniffed JPEG when nothing was declared.
    fn is_jpeg(&self) -> bool {
        match &self.media_type {
            Some(media_type) => media_type == JPEG_MEDIA_TYPE,
            None => image::guess_format(&self.data).is_ok_and(|f| f == ImageFormat::Jpeg),
        }
    }
}

/// ISO-BMFF `ftyp` box with a HEIF-family major brand.
fn has_heif_brand(data: &[u8]) -> bool {
    const BRANDS: &[&[u8; 4]] = &[b"heic", b"heix", b"hevc", b"heif", b"mif1", b"msf1"];
    data.len() >= 12 && &data[4..8] == b"ftyp" && BRANDS.iter().any(|b| &data[8..12] == *b)
}

/// A payload ready for the recognition request: always a lossy-compressed
/// raster bounded to the configured maximum resolution. Transient, one per
/// detection attempt.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    data: Vec<u8>,
    media_type: &'static str,
}

impl NormalizedImage {
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Converts arbitrary input images into bounded JPEG payloads.
#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    pub max_width: u32,
    pub max_height: u32,
}

impl ImageNormalizer {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Normalizes an uploaded or picked image.
    ///
    /// HEIC containers are converted, JPEG inputs pass through unchanged,
    /// everything else takes a pixel-buffer round trip; afterwards the
    /// result is downscaled if it exceeds the maximum resolution.
    pub fn normalize(&self, input: &RawImage) -> Result<NormalizedImage> {
        if input.data.is_empty() {
            return Err(DetectionError::Conversion("empty image payload".to_string()));
        }

        if input.is_heic() {
            debug!("converting HEIC input to JPEG");
            let img = decode(&input.data)
                .map_err(|err| DetectionError::Conversion(format!("HEIC conversion failed: {err}")))?;
            return self.encode_bounded(&img, STILL_QUALITY);
        }

        if input.is_jpeg() {
            let (width, height) = dimensions(&input.data)?;
            if width <= self.max_width && height <= self.max_height {
                return Ok(NormalizedImage {
                    data: input.data.clone(),
                    media_type: JPEG_MEDIA_TYPE,
                });
            }
            let img = decode(&input.data)?;
            return self.encode_bounded(&img, STILL_QUALITY);
        }

        let img = decode(&input.data)?;
        self.encode_bounded(&img, STILL_QUALITY)
    }

    /// Live camera frames are already pixel buffers: same re-encode path at
    /// a lighter quality, no container sniffing.
    pub fn normalize_frame(&self, frame: &DynamicImage) -> Result<NormalizedImage> {
        self.encode_bounded(frame, FRAME_QUALITY)
    }

    fn encode_bounded(&self, img: &DynamicImage, quality: u8) -> Result<NormalizedImage> {
        let (width, height) = (img.width(), img.height());
        if width <= self.max_width && height <= self.max_height {
            return encode_jpeg(img, quality);
        }

        let ratio = (self.max_width as f64 / width as f64).min(self.max_height as f64 / height as f64);
        let new_width = ((width as f64 * ratio).round() as u32).max(1);
        let new_height = ((height as f64 * ratio).round() as u32).max(1);
        debug!(width, height, new_width, new_height, "downscaling image");
        let resized = img.resize_exact(new_width, new_height, FilterType::CatmullRom);
        encode_jpeg(&resized, quality)
    }
}

fn decode(data: &[u8]) -> image::ImageResult<DynamicImage> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()
}

fn dimensions(data: &[u8]) -> image::ImageResult<(u32, u32)> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<NormalizedImage> {
    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| DetectionError::Conversion(err.to_string()))?;
    Ok(NormalizedImage {
        data,
        media_type: JPEG_MEDIA_TYPE,
    })
}
