//! Image processing implementation
//!
//! Handles the per-target transformation: scale → resize → encode.
//! The source is decoded once into a [`SourceImage`]; every target is
//! resized from a copy of the original pixels, so no derivative is ever
//! computed from a previously resized one.

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::{EncodedArtifact, ImageEncoder};
use super::error::ImageError;

/// Decoded source pixels, read-only for the rest of the invocation
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decode raw image bytes, guessing the format from the content
    pub fn decode(data: &[u8]) -> Result<Self, ImageError> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?
            .decode()
            .map_err(|e| ImageError::decode_failed(e.to_string()))?;

        Ok(Self {
            pixels: img.to_rgba8(),
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

/// Integer ratio of source width to target width
///
/// Zero when the target is wider than the source.
pub fn scale_divisor(source_width: u32, target_width: u32) -> u32 {
    if target_width == 0 {
        return 0;
    }
    source_width / target_width
}

/// Height preserving the aspect ratio through the divisor
///
/// `round(source_height / divisor)`, rounding halves away from zero. The
/// division is done in integers so the result never depends on binary
/// floating point.
pub fn scaled_height(source_height: u32, divisor: u32) -> Option<u32> {
    if divisor == 0 {
        return None;
    }
    let height = source_height as u64;
    let divisor = divisor as u64;
    let rounded = (2 * height + divisor) / (2 * divisor);
    u32::try_from(rounded).ok()
}

/// Compute the `(width, height)` box a target is resized to
pub fn target_dimensions(
    source_width: u32,
    source_height: u32,
    target_width: u32,
) -> Result<(u32, u32), ImageError> {
    let degenerate = || ImageError::DegenerateScale {
        source_width,
        source_height,
        target_width,
    };

    let divisor = scale_divisor(source_width, target_width);
    let height = scaled_height(source_height, divisor).ok_or_else(degenerate)?;
    if height == 0 {
        return Err(degenerate());
    }

    Ok((target_width, height))
}

/// Produce one encoded derivative of `source` at `target_width`
pub fn render_target(
    source: &SourceImage,
    target_width: u32,
    encoder: &dyn ImageEncoder,
) -> Result<EncodedArtifact, ImageError> {
    let (src_w, src_h) = source.dimensions();
    let (width, height) = target_dimensions(src_w, src_h, target_width)?;

    let pixels = if (width, height) == (src_w, src_h) {
        source.pixels.as_raw().clone()
    } else {
        resize_rgba(source, width, height)?
    };

    encoder.encode(&pixels, width, height)
}

/// Resize to exactly `target_w` x `target_h` with a Lanczos3 filter
fn resize_rgba(source: &SourceImage, target_w: u32, target_h: u32) -> Result<Vec<u8>, ImageError> {
    let src_width = NonZeroU32::new(source.width())
        .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(source.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        source.pixels.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    Ok(dst_image.into_vec())
}
