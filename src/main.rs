use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncRead;
use thumbnailer::config::Config;
use thumbnailer::event::parse_events;
use thumbnailer::metrics::ThumbnailMetrics;
use thumbnailer::sink::build_sink;
use thumbnailer::{ThumbnailError, ThumbnailGenerator};

/// Thumbnailer - generate resized derivatives for a newly uploaded image
#[derive(Parser, Debug)]
#[command(name = "thumbnailer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (environment variables are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the blob-created event JSON (single event or batch)
    #[arg(short, long)]
    event: PathBuf,

    /// File holding the uploaded object's content (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print Prometheus metrics to stdout when done
    #[arg(long)]
    print_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .map_err(ThumbnailError::Config)
    .context("Failed to load configuration")?;
    config
        .validate()
        .map_err(ThumbnailError::Config)
        .context("Invalid configuration")?;

    thumbnailer::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging subsystem")?;

    let targets = config.targets();
    tracing::info!(
        config_file = ?args.config,
        output_container = %config.output_container,
        targets = targets.len(),
        widths = ?targets.iter().map(|t| t.width).collect::<Vec<_>>(),
        "Configuration loaded successfully"
    );

    let payload = tokio::fs::read_to_string(&args.event)
        .await
        .with_context(|| format!("Failed to read event file {}", args.event.display()))?;
    let events: Vec<_> = parse_events(&payload)?
        .into_iter()
        .filter(|event| {
            if !event.is_blob_created() {
                tracing::info!(
                    event_type = %event.event_type,
                    id = %event.id,
                    "Ignoring event that is not a blob creation"
                );
            }
            event.is_blob_created()
        })
        .collect();

    if events.len() > 1 {
        bail!(
            "{} blob-created events in payload, but one content stream per invocation",
            events.len()
        );
    }
    let Some(event) = events.into_iter().next() else {
        tracing::info!("No blob-created event to process");
        return Ok(());
    };

    let sink = build_sink(&config)
        .await
        .context("Failed to build upload sink")?;
    let generator = ThumbnailGenerator::new(&config, Arc::from(sink))
        .with_metrics(ThumbnailMetrics::global());

    let content: Box<dyn AsyncRead + Unpin + Send> = match &args.input {
        Some(path) => Box::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?,
        ),
        None => Box::new(tokio::io::stdin()),
    };

    let report = generator.handle(event.source_url(), Some(content)).await?;
    tracing::info!(
        source = %event.source_url(),
        uploaded = report.upload_count(),
        unsupported = report.unsupported,
        "Invocation finished"
    );

    if args.print_metrics {
        print!("{}", ThumbnailMetrics::global().export());
    }

    Ok(())
}
