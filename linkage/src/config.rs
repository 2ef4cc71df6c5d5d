use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stepping and tolerance parameters shared by the position stepper and the
/// kinematic analyzer.
///
/// Every field has a default, so a RON file only needs to list what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Crank rotation per step, in degrees.
    pub revolute_step_deg: f64,
    /// Slider travel per step, in length units.
    pub prismatic_step: f64,
    /// Absolute per-coordinate tolerance for deciding that the newest frame
    /// returned to the seed frame.
    pub closure_tolerance: f64,
    /// Hard cap on successful steps per sub-assembly.
    pub max_steps: usize,
    /// Number of failed steps (direction reversals) after which stepping stops.
    pub stuck_limit: u32,
    /// Line slopes steeper than this are intersected as vertical lines.
    pub vertical_slope_limit: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            revolute_step_deg: 1.0,
            prismatic_step: 0.05,
            closure_tolerance: 1e-3,
            max_steps: 720,
            stuck_limit: 5,
            vertical_slope_limit: 1e8,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(source)?)
    }

    /// Seconds per step for an input driven at `input_speed` degrees per second.
    ///
    /// A stationary input has no meaningful clock; zero is reported.
    pub fn time_step(&self, input_speed: f64) -> f64 {
        if input_speed == 0.0 {
            0.0
        } else {
            self.revolute_step_deg / input_speed.abs()
        }
    }

    /// Linear travel per degree of equivalent input rotation.
    pub fn slide_ratio(&self) -> f64 {
        self.prismatic_step / self.revolute_step_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = SimulationConfig::from_ron_str("(max_steps: 90)").unwrap();
        assert_eq!(config.max_steps, 90);
        assert_eq!(config.stuck_limit, 5);
        assert_eq!(config.revolute_step_deg, 1.0);
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(SimulationConfig::from_ron_str("(max_steps: \"many\")").is_err());
    }
}
