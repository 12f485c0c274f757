use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid mass window [{min}, {max}): bounds must be finite with min < max")]
    InvalidMassWindow { min: f64, max: f64 },
}

/// Settings for ranging a list of mass-to-charge values.
#[derive(Debug, Clone, PartialEq)]
pub struct RangingConfig {
    /// Only masses within `[min, max)` are ranged; the rest are counted as excluded.
    pub mass_window: Option<(f64, f64)>,
    /// Whether ion counts are broken down into per-element atom counts.
    pub decompose: bool,
}

impl Default for RangingConfig {
    fn default() -> Self {
        Self {
            mass_window: None,
            decompose: true,
        }
    }
}

impl RangingConfig {
    /// Checks that a configured mass window has finite bounds with `min < max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mass_window {
            Some((min, max)) if !(min.is_finite() && max.is_finite() && min < max) => {
                Err(ConfigError::InvalidMassWindow { min, max })
            }
            _ => Ok(()),
        }
    }

    pub fn in_window(&self, mass: f64) -> bool {
        match self.mass_window {
            Some((min, max)) => min <= mass && mass < max,
            None => true,
        }
    }
}

#[derive(Default)]
pub struct RangingConfigBuilder {
    mass_window: Option<(f64, f64)>,
    decompose: Option<bool>,
}

impl RangingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mass_window(mut self, min: f64, max: f64) -> Self {
        self.mass_window = Some((min, max));
        self
    }
    pub fn decompose(mut self, decompose: bool) -> Self {
        self.decompose = Some(decompose);
        self
    }

    pub fn build(self) -> Result<RangingConfig, ConfigError> {
        let defaults = RangingConfig::default();
        let config = RangingConfig {
            mass_window: self.mass_window,
            decompose: self.decompose.unwrap_or(defaults.decompose),
        };
        config.validate()?;
        Ok(config)
    }
}
