use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid mass window format for '{0}'. Expected 'LOW:HIGH' (e.g., '10:80').")]
    InvalidMassWindowFormat(String),

    #[error("Component '{component}' of mass window '{window}' is not a number: '{value}'.")]
    InvalidNumber {
        component: &'static str,
        window: String,
        value: String,
    },
}

/// Parses a `LOW:HIGH` mass window. Ordering of the bounds is left to the caller.
pub fn parse_mass_window(window: &str) -> Result<(f64, f64), ParseError> {
    let (low, high) = window
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidMassWindowFormat(window.to_string()))?;

    let parse = |component: &'static str, value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                component,
                window: window.to_string(),
                value: value.trim().to_string(),
            })
    };

    Ok((parse("LOW", low)?, parse("HIGH", high)?))
}
