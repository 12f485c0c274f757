use super::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Invalid mass-to-charge value {value} at index {index}")]
    InvalidMass { index: usize, value: f64 },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
