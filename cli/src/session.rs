//! Event loop tying stdin script input, the render tick and background
//! decodes to one [`InteractionController`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use mono_pipeline::{
    Export, InteractionController, KeyOutcome, LoadOutcome, LoadTicket, read_image,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

use crate::config::AppConfig;
use crate::script::{ScriptLine, parse_line};
use crate::surface::HeadlessSurface;

type LoadResult = (LoadTicket, mono_pipeline::Result<mono_pipeline::image::RgbaImage>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    controller: InteractionController,
    surface: HeadlessSurface,
    export_dir: PathBuf,
    tick: Duration,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
}

impl Session {
    pub fn new(controller: InteractionController, config: &AppConfig) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            surface: HeadlessSurface::new(),
            export_dir: config.export_dir.clone(),
            tick: Duration::from_millis(config.tick_ms.max(1)),
            load_tx,
            load_rx,
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Run until `quit`, or until stdin closes and no load is pending.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stdin_open = true;

        loop {
            tokio::select! {
                line = lines.next_line(), if stdin_open => {
                    match line.context("Failed to read stdin")? {
                        Some(line) => {
                            if self.handle_line(&line).await == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            tracing::debug!("Script input closed");
                            stdin_open = false;
                        }
                    }
                }
                _ = ticker.tick() => {
                    self.controller.tick(&mut self.surface);
                    if !stdin_open && self.controller.snapshot().pending_load.is_none() {
                        break;
                    }
                }
                Some((ticket, result)) = self.load_rx.recv() => {
                    self.complete_load(ticket, result);
                }
            }
        }

        // Flush whatever the last input produced
        self.controller.tick(&mut self.surface);
        tracing::info!(frames = self.surface.frames(), "Session finished");
        Ok(())
    }

    /// Apply one script line. Bad lines are logged and skipped.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let parsed = match parse_line(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                tracing::warn!("Skipping script line {line:?}: {e:#}");
                return Flow::Continue;
            }
        };

        match parsed {
            ScriptLine::Key { key, mods } => match self.controller.handle_key(key, mods) {
                Ok(KeyOutcome::Exported(export)) => {
                    if let Err(e) = write_export(&self.export_dir, &export).await {
                        tracing::error!("Export failed: {e:#}");
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Key {key:?} failed: {e}"),
            },
            ScriptLine::Pointer(event) => self.controller.handle_pointer(event),
            ScriptLine::Drop(path) => self.drop_file(path),
            ScriptLine::Status => match serde_json::to_string(&self.controller.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("Failed to serialize status: {e}"),
            },
            ScriptLine::Tick => {
                self.controller.tick(&mut self.surface);
            }
            ScriptLine::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn drop_file(&mut self, path: PathBuf) {
        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        let Some(ticket) = self.controller.drop_file(mime.essence_str()) else {
            return;
        };

        tracing::info!(path = %path.display(), ticket = ticket.id(), "Decoding dropped image");
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || read_image(&path)).await {
                Ok(result) => result,
                Err(e) => Err(std::io::Error::other(e).into()),
            };
            // Receiver lives as long as the session
            let _ = tx.send((ticket, result));
        });
    }

    fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: mono_pipeline::Result<mono_pipeline::image::RgbaImage>,
    ) {
        match self.controller.complete_load(ticket, result) {
            LoadOutcome::Loaded { width, height } => {
                tracing::info!(width, height, "Dropped image loaded");
            }
            LoadOutcome::Failed(e) => tracing::warn!("Dropped image not loaded: {e}"),
            LoadOutcome::Stale => {}
        }
    }
}

async fn write_export(dir: &Path, export: &Export) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(&export.filename);
    tokio::fs::write(&path, &export.png)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = export.png.len(), "Image saved");
    Ok(path)
}
