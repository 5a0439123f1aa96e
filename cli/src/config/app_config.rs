//! Runtime configuration loaded from `MONO_*` environment variables.

use std::path::PathBuf;

use mono_pipeline::PipelineOptions;

use super::validation::validate_setting;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_size: u32,
    pub display_size: u32,
    pub threshold: u8,
    pub brush_size: u32,
    pub pan_step: i32,
    pub fit_to_width: bool,
    pub tick_ms: u64,
    pub export_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let options = PipelineOptions::default();
        Self {
            output_size: options.output_size,
            display_size: options.display_size,
            threshold: options.threshold,
            brush_size: options.brush_size,
            pan_step: options.pan_step,
            fit_to_width: options.fit_to_width,
            tick_ms: 16,
            export_dir: default_export_dir(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Invalid values are logged and
    /// replaced with the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| -> Option<String> {
            let value = lookup(key)?;
            match validate_setting(key, &value) {
                Ok(()) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring invalid {key}={value:?}: {e}");
                    None
                }
            }
        };

        Self {
            output_size: parse_or(get("MONO_OUTPUT_SIZE"), defaults.output_size),
            display_size: parse_or(get("MONO_DISPLAY_SIZE"), defaults.display_size),
            threshold: parse_or(get("MONO_THRESHOLD"), defaults.threshold),
            brush_size: parse_or(get("MONO_BRUSH_SIZE"), defaults.brush_size),
            pan_step: parse_or(get("MONO_PAN_STEP"), defaults.pan_step),
            fit_to_width: get("MONO_FIT_TO_WIDTH")
                .map(|v| v == "true")
                .unwrap_or(defaults.fit_to_width),
            tick_ms: parse_or(get("MONO_TICK_MS"), defaults.tick_ms),
            export_dir: get("MONO_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions::new()
            .with_output_size(self.output_size)
            .with_display_size(self.display_size)
            .with_threshold(self.threshold)
            .with_brush_size(self.brush_size)
            .with_pan_step(self.pan_step)
            .with_fit_to_width(self.fit_to_width)
    }
}

fn default_export_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
