//! card-scanner - Live trading-card recognition
//!
//! Replays a recorded OCR session through the title-consensus engine and,
//! once a title is read unambiguously, looks up its market price.

mod analysis;
mod capture;
mod config;
mod pricing;
mod replay;
mod storage;
mod vision;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::analysis::{ScanEvent, TitleReader};
use crate::config::ScannerConfig;
use crate::pricing::PriceClient;
use crate::storage::JsonFileStore;
use crate::vision::Orientation;

/// card-scanner - resolve a card title from noisy per-frame OCR
#[derive(Parser, Debug)]
#[command(name = "card-scanner")]
#[command(about = "Replay a recorded OCR session and resolve the card title")]
struct Args {
    /// Recorded session to replay (JSON)
    session: PathBuf,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Look up the market price of the detected title
    #[arg(long)]
    lookup_price: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = load_or_create_config(args.config.as_deref());

    let script = replay::load_script(&args.session)?;
    info!("replaying {} recorded frames", script.frames.len());
    let (frames, detector) = script.into_parts();

    let (reader, events) = TitleReader::new(detector, config.session.clone())
        .context("invalid session configuration")?;

    let mut title = None;
    let mut last_shortlist = Vec::new();

    'frames: for frame in &frames {
        let report = match reader.process_frame(frame, Orientation::default()).await {
            Ok(report) => report,
            Err(err) => {
                // Per-frame failures are non-fatal; the next frame may read fine
                warn!("frame skipped: {err}");
                continue;
            }
        };

        if let Some(candidates) = report.shortlist {
            last_shortlist = candidates;
        }

        for event in events.try_iter() {
            match event {
                ScanEvent::TitleDetected(detected) => {
                    title = Some(detected);
                    break 'frames;
                }
                ScanEvent::ObservationAccepted(bounds) => {
                    tracing::debug!(?bounds, "observation accepted");
                }
            }
        }
    }

    let Some(title) = title else {
        info!(
            "no unambiguous title after {} frames ({} observations)",
            reader.frames_analyzed(),
            reader.observation_count()
        );
        if !last_shortlist.is_empty() {
            println!("Candidates:");
            for candidate in &last_shortlist {
                println!("  {candidate}");
            }
        }
        return Ok(());
    };

    println!("Title: {title}");

    if args.lookup_price {
        let store = JsonFileStore::new(storage::get_data_dir()?.join("credentials.json"));
        let client = PriceClient::new(config.pricing, Box::new(store))
            .context("pricing is not configured")?;
        let price = client
            .resolve_price(&title)
            .await
            .with_context(|| format!("price lookup failed for \"{title}\""))?;
        println!("Price for {title}: {price}");
    }

    Ok(())
}

/// Load configuration from the given path, the platform config directory, or
/// fall back to defaults
fn load_or_create_config(path: Option<&std::path::Path>) -> ScannerConfig {
    if let Some(path) = path {
        match config::load_config(path) {
            Ok(config) => {
                info!("loaded configuration from {}", path.display());
                return config;
            }
            Err(err) => warn!("failed to load {}: {err}", path.display()),
        }
    } else if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("loaded configuration from {}", config_path.display());
                return config;
            }
        }
    }
    info!("using default configuration");
    ScannerConfig::default()
}
