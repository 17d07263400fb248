//! Session configuration.
//!
//! Every section carries `#[serde(default)]`, so a JSON file only needs the
//! fields it changes:
//!
//! ```json
//! { "seed": 7, "classifier": { "debounce_ms": 600 } }
//! ```

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use hand_signal::{ClassifierConfig, RotationConfig};
use morph_field::{PopulationSpec, SceneRotationConfig, ShapeConfig};

use crate::error::AppError;

// ════════════════════════════════════════════════════════════════════════════
// CaptureConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Interval between synthetic or replayed frames.
    pub cadence_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig { cadence_ms: 33 }
    }
}

impl CaptureConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SessionConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub shape:       ShapeConfig,
    pub populations: Vec<PopulationSpec>,
    pub classifier:  ClassifierConfig,
    pub rotation:    RotationConfig,
    pub scene:       SceneRotationConfig,
    pub capture:     CaptureConfig,
    /// Population seed; drawn at startup when absent.
    pub seed:        Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            shape:       ShapeConfig::default(),
            populations: PopulationSpec::defaults(),
            classifier:  ClassifierConfig::default(),
            rotation:    RotationConfig::default(),
            scene:       SceneRotationConfig::default(),
            capture:     CaptureConfig::default(),
            seed:        None,
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| AppError::Io { path: path.to_path_buf(), source })?;
        let cfg = Self::from_json(&text)?;
        log::info!("loaded session config from {}", path.display());
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject anything that would produce degenerate geometry or an
    /// unusable classifier.
    pub fn validate(&self) -> Result<(), AppError> {
        self.shape.validate()?;
        for spec in &self.populations {
            spec.validate()?;
        }
        self.classifier.validate()?;
        self.rotation.validate()?;
        self.scene.validate()?;
        if self.capture.cadence_ms == 0 {
            return Err(AppError::ZeroCadence);
        }
        Ok(())
    }

    /// The configured seed, or a fresh one from the thread RNG.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
