//! Thumbnail generation end-to-end tests
//!
//! Tests the complete invocation flow:
//!   source reference + content stream → encoder selection → resize → upload

use super::test_harness::{create_test_image, inspect, memory_generator};
use image::ImageFormat;
use rstest::rstest;
use thumbnailer::naming::{derive_name, object_key};
use thumbnailer::ThumbnailError;

const SOURCE_PNG: &str = "https://acct.blob.core.windows.net/images/photos/pic.png";

#[tokio::test]
async fn test_three_targets_produce_three_uploads() {
    let (generator, sink) = memory_generator([500, 333, 100]);
    let data = create_test_image(1000, 500, ImageFormat::Png);

    let report = generator
        .handle(SOURCE_PNG, Some(data.as_slice()))
        .await
        .expect("Invocation should succeed");

    assert_eq!(report.upload_count(), 3);
    assert!(report.skipped_targets.is_empty());

    let expected_keys: Vec<String> = ["-b", "-m", "-s"]
        .iter()
        .map(|tag| object_key(&derive_name(SOURCE_PNG, tag)))
        .collect();
    assert_eq!(sink.keys(), expected_keys);
    assert_eq!(
        sink.keys(),
        vec!["photos/pic-b.png", "photos/pic-m.png", "photos/pic-s.png"]
    );
}

#[tokio::test]
async fn test_uploaded_dimensions_follow_divisor() {
    let (generator, sink) = memory_generator([500, 333, 100]);
    let data = create_test_image(1000, 500, ImageFormat::Png);

    generator
        .handle(SOURCE_PNG, Some(data.as_slice()))
        .await
        .unwrap();

    // divisor 2 → 250, divisor 3 → round(166.67) = 167, divisor 10 → 50
    let big = inspect(&sink.get("photos/pic-b.png").unwrap().data);
    let medium = inspect(&sink.get("photos/pic-m.png").unwrap().data);
    let small = inspect(&sink.get("photos/pic-s.png").unwrap().data);

    assert_eq!((big.0, big.1), (500, 250));
    assert_eq!((medium.0, medium.1), (333, 167));
    assert_eq!((small.0, small.1), (100, 50));
}

#[rstest]
#[case("https://x/images/pic.png", ImageFormat::Png, "image/png")]
#[case("https://x/images/pic.jpg", ImageFormat::Jpeg, "image/jpeg")]
#[case("https://x/images/pic.JPEG", ImageFormat::Jpeg, "image/jpeg")]
#[case("https://x/images/pic.gif", ImageFormat::Gif, "image/gif")]
#[tokio::test]
async fn test_derivatives_keep_source_format(
    #[case] source: &str,
    #[case] format: ImageFormat,
    #[case] content_type: &str,
) {
    let (generator, sink) = memory_generator([60, 30, 15]);
    let data = create_test_image(120, 90, format);

    generator.handle(source, Some(data.as_slice())).await.unwrap();

    let objects = sink.objects();
    assert_eq!(objects.len(), 3);
    for object in objects {
        assert_eq!(object.content_type, content_type);
        assert_eq!(inspect(&object.data).2, format);
    }
}

#[rstest]
#[case("https://x/images/pic.bmp")]
#[case("https://x/images/pic.webp")]
#[case("https://x/images/pic")]
#[tokio::test]
async fn test_unsupported_extension_uploads_nothing(#[case] source: &str) {
    let (generator, sink) = memory_generator([60, 30, 15]);
    let data = create_test_image(120, 90, ImageFormat::Png);

    let report = generator
        .handle(source, Some(data.as_slice()))
        .await
        .expect("Unsupported formats are not an error");

    assert!(report.unsupported);
    assert_eq!(report.upload_count(), 0);
    assert_eq!(sink.attempts(), 0);
}

#[tokio::test]
async fn test_extension_drives_encoder_not_content() {
    // PNG bytes behind a .jpg name are re-encoded as JPEG
    let (generator, sink) = memory_generator([60, 30, 15]);
    let data = create_test_image(120, 90, ImageFormat::Png);

    generator
        .handle("https://x/images/mislabeled.jpg", Some(data.as_slice()))
        .await
        .unwrap();

    let stored = sink.get("mislabeled-b.jpg").unwrap();
    assert_eq!(inspect(&stored.data).2, ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_targets_wider_than_source_are_skipped() {
    let (generator, sink) = memory_generator([800, 400, 50]);
    let data = create_test_image(300, 200, ImageFormat::Png);

    let report = generator
        .handle("https://x/images/small.png", Some(data.as_slice()))
        .await
        .unwrap();

    assert_eq!(report.skipped_targets.len(), 2);
    assert_eq!(sink.keys(), vec!["small-s.png"]);

    let (w, h, _) = inspect(&sink.get("small-s.png").unwrap().data);
    assert_eq!((w, h), (50, 33));
}

#[tokio::test]
async fn test_corrupt_content_fails_invocation() {
    let (generator, sink) = memory_generator([60, 30, 15]);

    let result = generator
        .handle("https://x/images/broken.png", Some(&b"\x89PNG truncated"[..]))
        .await;

    assert!(matches!(result, Err(ThumbnailError::Image(_))));
    assert_eq!(sink.attempts(), 0);
}

#[tokio::test]
async fn test_upload_failure_stops_remaining_targets() {
    let (generator, sink) = memory_generator([60, 30, 15]);
    sink.fail_on_upload(0);
    let data = create_test_image(120, 90, ImageFormat::Png);

    let result = generator
        .handle("https://x/images/pic.png", Some(data.as_slice()))
        .await;

    assert!(matches!(result, Err(ThumbnailError::Sink(_))));
    assert_eq!(sink.attempts(), 1);
    assert_eq!(sink.upload_count(), 0);
}

#[rstest]
#[case("https://acct.blob.core.windows.net/images/pic.png?st=2024-01-01T00:00:00.000Z")]
#[case("https://acct.blob.core.windows.net/images/pic.png?sv=2020&sig=abc")]
#[case("https://acct.blob.core.windows.net/images/pic.png#v2")]
#[tokio::test]
async fn test_reference_with_query_is_not_processed(#[case] source: &str) {
    let (generator, sink) = memory_generator([60, 30, 15]);
    let data = create_test_image(120, 90, ImageFormat::Png);

    let report = generator.handle(source, Some(data.as_slice())).await.unwrap();

    assert!(report.unsupported);
    assert_eq!(sink.attempts(), 0);
}

#[tokio::test]
async fn test_unescaped_reference_uploads_under_blob_name() {
    let (generator, sink) = memory_generator([60, 30, 15]);
    let data = create_test_image(120, 90, ImageFormat::Png);

    let report = generator
        .handle(
            "https://acct.blob.core.windows.net/images/albums/my pic.png",
            Some(data.as_slice()),
        )
        .await
        .unwrap();

    assert_eq!(
        report.uploaded,
        vec![
            "albums/my pic-b.png",
            "albums/my pic-m.png",
            "albums/my pic-s.png"
        ]
    );
    assert_eq!(sink.keys(), report.uploaded);
}
