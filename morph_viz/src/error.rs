//! Errors surfaced by the viewer binary.

use std::path::PathBuf;

use thiserror::Error;

use hand_signal::SignalConfigError;
use morph_field::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid scene configuration: {0}")]
    Scene(#[from] ConfigError),

    #[error("invalid gesture configuration: {0}")]
    Signal(#[from] SignalConfigError),

    #[error("capture cadence must be at least 1 ms")]
    ZeroCadence,

    #[error("headless duration must be a finite number of seconds, got {0}")]
    HeadlessDuration(f32),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("replay line {line}: {source}")]
    Replay {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("window: {0}")]
    Window(String),
}
