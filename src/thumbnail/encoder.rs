//! Image encoder abstraction
//!
//! Derivatives keep the format of their source, so the encoder is picked
//! once per invocation from the source extension and reused for every
//! target:
//! - `png` → [`PngEncoder`]
//! - `jpg` / `jpeg` → [`JpegEncoder`]
//! - `gif` → [`GifEncoder`]

use bytes::Bytes;
use std::io::Cursor;

use super::error::ImageError;
use crate::constants::DEFAULT_JPEG_QUALITY;

/// Output formats a derivative can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    /// Resolve a file extension (with or without leading dots, any case)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let normalized = extension.trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "gif" => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Gif => "gif",
        }
    }
}

/// Quality settings for lossy encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderQuality {
    /// JPEG quality (1-100, where 100 is best quality)
    pub jpeg_quality: u8,
}

impl Default for EncoderQuality {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl EncoderQuality {
    pub fn with_jpeg_quality(quality: u8) -> Self {
        Self {
            jpeg_quality: quality.clamp(1, 100),
        }
    }
}

/// One encoded derivative, ready for upload
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    /// The encoded image bytes
    pub data: Bytes,
    /// The output format
    pub format: OutputFormat,
    /// Content-Type value for the upload
    pub content_type: &'static str,
    /// Encoded dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl EncodedArtifact {
    pub fn new(data: Vec<u8>, format: OutputFormat, width: u32, height: u32) -> Self {
        Self {
            data: Bytes::from(data),
            format,
            content_type: format.content_type(),
            dimensions: (width, height),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Trait for image encoders
///
/// Object-safe so the selected encoder can be held as `Box<dyn ImageEncoder>`
/// for the whole invocation.
pub trait ImageEncoder: Send + Sync {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode raw RGBA pixels (4 bytes per pixel)
    fn encode(&self, data: &[u8], width: u32, height: u32)
        -> Result<EncodedArtifact, ImageError>;
}

/// JPEG encoder using the image crate
pub struct JpegEncoder {
    quality: u8,
}

impl JpegEncoder {
    pub fn new(quality: EncoderQuality) -> Self {
        Self {
            quality: quality.jpeg_quality.clamp(1, 100),
        }
    }
}

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<EncodedArtifact, ImageError> {
        use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
        use image::ImageEncoder as _;

        // JPEG has no alpha channel
        let rgb_data = rgba_to_rgb(data);

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageJpegEncoder::new_with_quality(&mut output, self.quality);

        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| ImageError::encode_failed("jpeg", e.to_string()))?;

        Ok(EncodedArtifact::new(
            output.into_inner(),
            OutputFormat::Jpeg,
            width,
            height,
        ))
    }
}

/// PNG encoder using the image crate
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<EncodedArtifact, ImageError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(data, width, height, image::ColorType::Rgba8)
            .map_err(|e| ImageError::encode_failed("png", e.to_string()))?;

        Ok(EncodedArtifact::new(
            output.into_inner(),
            OutputFormat::Png,
            width,
            height,
        ))
    }
}

/// GIF encoder using the image crate
///
/// Pixels are quantized to a 256-colour palette; a fully transparent pixel
/// keeps its transparency.
pub struct GifEncoder;

impl ImageEncoder for GifEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Gif
    }

    fn encode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<EncodedArtifact, ImageError> {
        use image::codecs::gif::GifEncoder as ImageGifEncoder;

        let mut output = Cursor::new(Vec::new());
        {
            // The trailer is written when the encoder is dropped
            let mut encoder = ImageGifEncoder::new(&mut output);
            encoder
                .encode(data, width, height, image::ColorType::Rgba8)
                .map_err(|e| ImageError::encode_failed("gif", e.to_string()))?;
        }

        Ok(EncodedArtifact::new(
            output.into_inner(),
            OutputFormat::Gif,
            width,
            height,
        ))
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat, quality: EncoderQuality) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::Jpeg => Box::new(JpegEncoder::new(quality)),
            OutputFormat::Gif => Box::new(GifEncoder),
        }
    }
}

/// Select the encoder for a source extension
///
/// Returns `None` for anything other than `gif`, `png`, `jpg` or `jpeg`.
/// That is the caller's signal to skip the invocation, not an error.
pub fn select_encoder(extension: &str, quality: EncoderQuality) -> Option<Box<dyn ImageEncoder>> {
    OutputFormat::from_extension(extension).map(|format| EncoderFactory::create(format, quality))
}

/// Convert RGBA to RGB by discarding alpha channel
fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let pixel_count = rgba.len() / 4;
    let mut rgb = Vec::with_capacity(pixel_count * 3);

    for chunk in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&chunk[..3]);
    }

    rgb
}
