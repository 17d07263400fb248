//! Errors for classifier and rotation configuration.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalConfigError {
    /// The fist threshold must sit below the open-palm threshold, or the
    /// dead band between them would be empty.
    #[error("fist ratio {fist} must be below open ratio {open}")]
    InvertedThresholds { fist: f32, open: f32 },

    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },
}
