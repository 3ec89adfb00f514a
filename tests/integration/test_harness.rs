// Shared helpers for integration tests

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use thumbnailer::sink::MemorySink;
use thumbnailer::thumbnail::EncoderQuality;
use thumbnailer::{TargetSpec, ThumbnailGenerator};

/// Encode a gradient test image of the given size
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
    });

    // JPEG has no alpha channel
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img),
    };

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .expect("Failed to encode test image");
    buffer.into_inner()
}

/// Generator with the standard big/medium/small tags over a memory sink
pub fn memory_generator(widths: [u32; 3]) -> (ThumbnailGenerator, MemorySink) {
    let sink = MemorySink::new();
    let targets = vec![
        TargetSpec::new(widths[0], "-b"),
        TargetSpec::new(widths[1], "-m"),
        TargetSpec::new(widths[2], "-s"),
    ];
    let generator =
        ThumbnailGenerator::with_targets(targets, EncoderQuality::default(), Arc::new(sink.clone()));
    (generator, sink)
}

/// Decode uploaded bytes and return (width, height, detected format)
pub fn inspect(data: &[u8]) -> (u32, u32, ImageFormat) {
    let format = image::guess_format(data).expect("Unknown image format");
    let img = image::load_from_memory(data).expect("Failed to decode artifact");
    (img.width(), img.height(), format)
}
