//! Application entry point for the gravity playground.
//!
//! This binary parses the command line, sets up logging and eframe/egui,
//! and delegates all interactive logic and rendering to [`Viewer`].

mod viewer;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gravity_core::config::Config;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(about = "Place point masses with the mouse and watch them attract")]
struct Args {
    /// JSON file overriding the default tuning.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random initial masses.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    Ok(cfg)
}

/// Starts the native eframe application.
///
/// The initial window is sized to fit the configured canvas plus the
/// control and status bars.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let cfg = load_config(&args).context("loading configuration")?;
    log::info!(
        "starting with a {}×{} canvas, up to {} bodies",
        cfg.canvas_width,
        cfg.canvas_height,
        cfg.max_bodies
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([cfg.canvas_width + 16.0, cfg.canvas_height + 96.0]),
        ..Default::default()
    };
    let viewer = Viewer::new(cfg).context("setting up the playground")?;

    eframe::run_native(
        "Gravity Playground",
        options,
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
