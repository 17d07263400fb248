//! Configuration errors raised while building populations.

use thiserror::Error;

/// Rejected population or shape parameters.
///
/// Raised at construction time so degenerate geometry never reaches the
/// animators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A population was configured with zero entities.
    #[error("population `{0}` has no entities")]
    EmptyPopulation(String),

    /// A length, radius or rate that must be strictly positive.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A NaN or infinite parameter.
    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },
}

/// Result type for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Check that `value` is finite and strictly positive.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(value)
}

/// Check that `value` is finite (any sign).
pub(crate) fn finite(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert_eq!(
            positive("radius", 0.0),
            Err(ConfigError::NonPositive { field: "radius", value: 0.0 })
        );
        assert_eq!(positive("radius", f32::NAN), Err(ConfigError::NonFinite { field: "radius" }));
        assert_eq!(positive("radius", 2.5), Ok(2.5));
    }

    #[test]
    fn messages_name_the_field() {
        let e = ConfigError::NonPositive { field: "scatter_radius", value: -1.0 };
        assert_eq!(e.to_string(), "`scatter_radius` must be positive, got -1");
    }
}
