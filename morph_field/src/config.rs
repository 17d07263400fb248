//! Shared geometry of the assembled cone and the scatter ball.

use serde::{Deserialize, Serialize};

use crate::error::{positive, ConfigError};

/// Session-wide shape parameters.
///
/// Populations scale `base_radius` and `scatter_radius` by their own
/// factors; see [`crate::PopulationSpec`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    /// Cone height; the cone spans `[-height/2, height/2]` vertically.
    pub height:         f32,
    /// Cone radius at its base.
    pub base_radius:    f32,
    /// Radius of the ball the scatter positions are drawn from.
    pub scatter_radius: f32,
    /// Peak-to-peak horizontal jitter added to cone positions.
    pub jitter:         f32,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        ShapeConfig {
            height:         12.0,
            base_radius:    4.5,
            scatter_radius: 25.0,
            jitter:         0.2,
        }
    }
}

impl ShapeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("height", self.height)?;
        positive("base_radius", self.base_radius)?;
        positive("scatter_radius", self.scatter_radius)?;
        if !self.jitter.is_finite() {
            return Err(ConfigError::NonFinite { field: "jitter" });
        }
        if self.jitter < 0.0 {
            return Err(ConfigError::NonPositive { field: "jitter", value: self.jitter });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shape_is_valid() {
        assert!(ShapeConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_jitter_is_allowed() {
        let shape = ShapeConfig { jitter: 0.0, ..ShapeConfig::default() };
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn negative_radius_rejected() {
        let shape = ShapeConfig { scatter_radius: -3.0, ..ShapeConfig::default() };
        assert!(matches!(
            shape.validate(),
            Err(ConfigError::NonPositive { field: "scatter_radius", .. })
        ));
    }
}
