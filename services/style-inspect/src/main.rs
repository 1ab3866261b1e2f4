//! Map style inspector.
//!
//! Loads a style document with all of its links, compiles every layer and
//! prints a JSON report of what each layer evaluates to at a given zoom
//! level for a given feature.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use style_common::Feature;
use style_links::{StyleInput, StyleLoader};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{FileConfig, Overrides};
use report::StyleReport;

#[derive(Parser, Debug)]
#[command(name = "style-inspect")]
#[command(about = "Load, compile and evaluate a map style")]
struct Args {
    /// Style document: a file path, an http(s) URL or a mapbox://styles/ URL
    style: String,

    /// Zoom level to evaluate at
    #[arg(short, long, default_value = "10")]
    zoom: f64,

    /// Feature to evaluate, as JSON: {"type": "Polygon", "id": 1, "properties": {...}}
    #[arg(short, long)]
    feature: Option<String>,

    /// Fail when a layer's ref names a missing layer
    #[arg(long)]
    strict_refs: bool,

    /// Access token for mapbox:// links
    #[arg(long, env = "MAPBOX_ACCESS_TOKEN")]
    access_token: Option<String>,

    /// API root mapbox:// links are rewritten against
    #[arg(long, env = "STYLE_API_ROOT")]
    api_root: Option<String>,

    /// Display pixel ratio (selects @2x sprites above 1)
    #[arg(long)]
    pixel_ratio: Option<f64>,

    /// YAML file with loader settings
    #[arg(long, env = "STYLE_INSPECT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the report, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let file_config = args.config.as_deref().map(FileConfig::load).transpose()?;
    let loader_config = config::resolve(
        file_config,
        Overrides {
            access_token: args.access_token,
            api_root: args.api_root,
            pixel_ratio: args.pixel_ratio,
        },
    )?;

    let feature: Feature = match &args.feature {
        Some(json) => serde_json::from_str(json).context("Failed to parse --feature")?,
        None => Feature::default(),
    };

    info!(style = %args.style, zoom = args.zoom, "Inspecting style");

    let loader = StyleLoader::http(&loader_config)
        .context("Failed to create HTTP client")?
        .with_strict_refs(args.strict_refs);

    let loaded = loader
        .load(StyleInput::from_arg(&args.style))
        .await
        .with_context(|| format!("Failed to load style {}", args.style))?;

    let compiled = loaded.compile().context("Failed to compile style")?;

    let report = StyleReport::new(&loaded, &compiled, args.zoom, &feature);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
