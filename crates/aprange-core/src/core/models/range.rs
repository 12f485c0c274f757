use super::color::{Color, ColorError, ColorSpec};
use super::ion::{FormulaError, Ion};
use std::fmt;
use std::ops::{Bound, RangeBounds};
use thiserror::Error;

pub const DEFAULT_VOLUME: f64 = 1.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RangeError {
    #[error("Range bound must be finite (value: {value})")]
    NonFiniteBound { value: f64 },
    #[error("Lower bound must be non-negative (value: {lower})")]
    NegativeLower { lower: f64 },
    #[error("Lower bound {lower} must be strictly less than upper bound {upper}")]
    EmptyInterval { lower: f64, upper: f64 },
    #[error("Volume must be a finite positive number (value: {volume})")]
    InvalidVolume { volume: f64 },
    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),
    #[error("Invalid ion formula: {0}")]
    Formula(#[from] FormulaError),
}

/// The ion argument of [`Range::new`] and [`Range::set_ion`]: either a formula to parse
/// or an already constructed [`Ion`].
#[derive(Debug, Clone, PartialEq)]
pub enum IonSpec {
    Formula(String),
    Ion(Ion),
}

impl IonSpec {
    pub fn resolve(self) -> Result<Ion, FormulaError> {
        match self {
            IonSpec::Formula(formula) => Ion::from_formula(&formula),
            IonSpec::Ion(ion) => Ok(ion),
        }
    }
}

impl From<&str> for IonSpec {
    fn from(formula: &str) -> Self {
        IonSpec::Formula(formula.to_string())
    }
}

impl From<String> for IonSpec {
    fn from(formula: String) -> Self {
        IonSpec::Formula(formula)
    }
}

impl From<Ion> for IonSpec {
    fn from(ion: Ion) -> Self {
        IonSpec::Ion(ion)
    }
}

/// A closed-open mass-to-charge interval `[lower, upper)` labelled with an ion.
///
/// All fields are validated on construction and on every setter call; a rejected
/// update leaves the range untouched, so `0 <= lower < upper` and `volume > 0` hold
/// for the whole lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    ion: Ion,
    lower: f64,
    upper: f64,
    volume: f64,
    color: Color,
}

impl Range {
    /// Creates a range with the default volume (`1.0`) and color (black).
    ///
    /// # Arguments
    ///
    /// * `ion` - A formula string or a pre-built [`Ion`].
    /// * `interval` - The `(lower, upper)` mass-to-charge bounds.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::Formula`] for an unparsable formula, and
    /// [`RangeError::NonFiniteBound`], [`RangeError::NegativeLower`] or
    /// [`RangeError::EmptyInterval`] for an invalid interval.
    pub fn new(ion: impl Into<IonSpec>, interval: (f64, f64)) -> Result<Self, RangeError> {
        let ion = ion.into().resolve()?;
        let (lower, upper) = interval;
        validate_interval(lower, upper)?;
        Ok(Self {
            ion,
            lower,
            upper,
            volume: DEFAULT_VOLUME,
            color: Color::default(),
        })
    }

    pub fn with_volume(mut self, volume: f64) -> Result<Self, RangeError> {
        self.set_volume(volume)?;
        Ok(self)
    }

    pub fn with_color(mut self, color: impl Into<ColorSpec>) -> Result<Self, RangeError> {
        self.set_color(color)?;
        Ok(self)
    }

    pub fn ion(&self) -> &Ion {
        &self.ion
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn num_elements(&self) -> usize {
        self.ion.num_elements()
    }

    pub fn hill_formula(&self) -> String {
        self.ion.hill_formula()
    }

    /// True iff `lower <= mass < upper`.
    pub fn contains(&self, mass: f64) -> bool {
        self.lower <= mass && mass < self.upper
    }

    /// True iff the two intervals share at least one point. Ranges that only touch at
    /// a boundary (`self.upper == other.lower`) do not intersect.
    pub fn intersects(&self, other: &Range) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }

    pub fn set_lower(&mut self, lower: f64) -> Result<(), RangeError> {
        validate_interval(lower, self.upper)?;
        self.lower = lower;
        Ok(())
    }

    pub fn set_upper(&mut self, upper: f64) -> Result<(), RangeError> {
        validate_interval(self.lower, upper)?;
        self.upper = upper;
        Ok(())
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<(), RangeError> {
        if !volume.is_finite() || volume <= 0.0 {
            return Err(RangeError::InvalidVolume { volume });
        }
        self.volume = volume;
        Ok(())
    }

    pub fn set_color(&mut self, color: impl Into<ColorSpec>) -> Result<(), RangeError> {
        self.color = color.into().resolve()?;
        Ok(())
    }

    pub fn set_ion(&mut self, ion: impl Into<IonSpec>) -> Result<(), RangeError> {
        self.ion = ion.into().resolve()?;
        Ok(())
    }
}

fn validate_interval(lower: f64, upper: f64) -> Result<(), RangeError> {
    for value in [lower, upper] {
        if !value.is_finite() {
            return Err(RangeError::NonFiniteBound { value });
        }
    }
    if lower < 0.0 {
        return Err(RangeError::NegativeLower { lower });
    }
    if lower >= upper {
        return Err(RangeError::EmptyInterval { lower, upper });
    }
    Ok(())
}

impl RangeBounds<f64> for Range {
    fn start_bound(&self) -> Bound<&f64> {
        Bound::Included(&self.lower)
    }

    fn end_bound(&self) -> Bound<&f64> {
        Bound::Excluded(&self.upper)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.ion, self.lower, self.upper)
    }
}
