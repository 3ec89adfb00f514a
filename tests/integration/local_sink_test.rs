//! Filesystem sink end-to-end test
//!
//! Builds the sink from configuration the same way the binary does.

use super::test_harness::{create_test_image, inspect};
use image::ImageFormat;
use std::sync::Arc;
use tempfile::TempDir;
use thumbnailer::config::Config;
use thumbnailer::sink::build_sink;
use thumbnailer::ThumbnailGenerator;

fn local_config(root: &std::path::Path) -> Config {
    let yaml = format!(
        r#"
widths: {{ big: 400, medium: 200, small: 100 }}
output_container: thumbnails
jpeg_quality: 85
sink:
  type: local
  root: {}
"#,
        root.display()
    );
    Config::from_yaml_with_env(&yaml).expect("Valid YAML should parse")
}

#[tokio::test]
async fn test_invocation_writes_derivatives_to_disk() {
    let dir = TempDir::new().unwrap();
    let config = local_config(dir.path());
    config.validate().unwrap();

    let sink = build_sink(&config).await.unwrap();
    let generator = ThumbnailGenerator::new(&config, Arc::from(sink));
    let data = create_test_image(800, 600, ImageFormat::Jpeg);

    let report = generator
        .handle(
            "https://acct.blob.core.windows.net/uploads/2024/cat.jpg",
            Some(data.as_slice()),
        )
        .await
        .unwrap();
    assert_eq!(report.upload_count(), 3);

    let base = dir.path().join("thumbnails/2024");
    for (name, expected) in [
        ("cat-b.jpg", (400, 300)),
        ("cat-m.jpg", (200, 150)),
        ("cat-s.jpg", (100, 75)),
    ] {
        let bytes = std::fs::read(base.join(name)).unwrap();
        let (w, h, format) = inspect(&bytes);
        assert_eq!((w, h), expected, "{}", name);
        assert_eq!(format, ImageFormat::Jpeg);
    }
}

#[tokio::test]
async fn test_duplicate_widths_write_one_file() {
    let dir = TempDir::new().unwrap();
    let mut config = local_config(dir.path());
    config.widths.small = config.widths.medium;

    let sink = build_sink(&config).await.unwrap();
    let generator = ThumbnailGenerator::new(&config, Arc::from(sink));
    let data = create_test_image(800, 600, ImageFormat::Png);

    let report = generator
        .handle("https://x/uploads/dog.png", Some(data.as_slice()))
        .await
        .unwrap();

    assert_eq!(report.uploaded, vec!["dog-b.png", "dog-m.png"]);
    assert!(!dir.path().join("thumbnails/dog-s.png").exists());
}
