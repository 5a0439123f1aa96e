//! Headless monochromifier.
//!
//! Loads an image, then reads input events from stdin (one per line) and
//! drives the interactive pipeline with a fixed render tick. Exports land in
//! `MONO_EXPORT_DIR`.

mod config;
mod script;
mod session;
mod surface;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mono_pipeline::{InteractionController, read_image};

use crate::config::AppConfig;
use crate::session::Session;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Stdout carries `status` output, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let config = AppConfig::load();
    tracing::debug!(?config, "Configuration loaded");

    let path = std::env::args()
        .nth(1)
        .context("usage: monochromifier <image>")?;
    tracing::info!("Loading {path}");
    let image = tokio::task::spawn_blocking({
        let path = path.clone();
        move || read_image(path)
    })
    .await?
    .with_context(|| format!("Failed to load {path}"))?;

    let controller = InteractionController::new(image, config.pipeline_options())?;
    Session::new(controller, &config).run().await
}
