use super::element::{Element, ParseElementError};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,
    #[error("Unexpected character '{character}' at position {position} in formula '{formula}'")]
    UnexpectedCharacter {
        formula: String,
        character: char,
        position: usize,
    },
    #[error("Zero multiplier at position {position} in formula '{formula}'")]
    ZeroCount { formula: String, position: usize },
    #[error("Unbalanced parentheses in formula '{0}'")]
    UnbalancedParentheses(String),
    #[error("Element count overflows in formula '{0}'")]
    CountOverflow(String),
    #[error(transparent)]
    InvalidElement(#[from] ParseElementError),
    #[error("Composition must contain at least one element")]
    EmptyComposition,
    #[error("Element '{0}' has a zero count in composition")]
    ZeroElementCount(String),
    #[error("Count of element '{0}' overflows in composition")]
    ElementCountOverflow(String),
}

/// A chemical identity assigned to a mass range, described by its elemental composition.
///
/// Two ions are equal when their compositions are equal, independently of the order in
/// which the formula was written (`OCr` and `CrO` are the same ion).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ion {
    composition: BTreeMap<Element, u32>,
}

impl Ion {
    /// Parses a chemical formula such as `Cr2O`, `SiO2` or `(CH3)2`.
    ///
    /// Repeated elements accumulate and parenthesised groups may carry a multiplier.
    ///
    /// # Errors
    ///
    /// Returns a [`FormulaError`] if the formula is empty, contains characters other than
    /// element symbols, digits and parentheses, has unbalanced parentheses or a zero count.
    pub fn from_formula(formula: &str) -> Result<Self, FormulaError> {
        let trimmed = formula.trim();
        if trimmed.is_empty() {
            return Err(FormulaError::Empty);
        }
        let composition = FormulaParser::new(trimmed).parse()?;
        if composition.is_empty() {
            return Err(FormulaError::EmptyComposition);
        }
        Ok(Self { composition })
    }

    /// Builds an ion from pre-computed `(element, count)` pairs.
    ///
    /// Pairs naming the same element are summed.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::EmptyComposition`] for an empty iterator,
    /// [`FormulaError::ZeroElementCount`] if any count is zero and
    /// [`FormulaError::ElementCountOverflow`] if merged counts exceed `u32`.
    pub fn from_composition<I>(composition: I) -> Result<Self, FormulaError>
    where
        I: IntoIterator<Item = (Element, u32)>,
    {
        let mut merged: BTreeMap<Element, u32> = BTreeMap::new();
        for (element, count) in composition {
            if count == 0 {
                return Err(FormulaError::ZeroElementCount(element.symbol().to_string()));
            }
            let symbol = element.symbol().to_string();
            let entry = merged.entry(element).or_insert(0);
            *entry = entry
                .checked_add(count)
                .ok_or(FormulaError::ElementCountOverflow(symbol))?;
        }
        if merged.is_empty() {
            return Err(FormulaError::EmptyComposition);
        }
        Ok(Self {
            composition: merged,
        })
    }

    pub fn composition(&self) -> &BTreeMap<Element, u32> {
        &self.composition
    }

    /// Number of distinct element types in the composition.
    pub fn num_elements(&self) -> usize {
        self.composition.len()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.composition.keys()
    }

    pub fn count_of(&self, symbol: &str) -> u32 {
        self.composition.get(symbol).copied().unwrap_or(0)
    }

    pub fn total_atoms(&self) -> u32 {
        self.composition.values().sum()
    }

    /// Elements in Hill order: carbon first, hydrogen second, then alphabetical.
    /// Without carbon every element, hydrogen included, is alphabetical.
    pub fn hill_order(&self) -> Vec<(&Element, u32)> {
        let has_carbon = self.composition.contains_key("C");
        if !has_carbon {
            return self.composition.iter().map(|(e, &n)| (e, n)).collect();
        }
        let mut ordered = Vec::with_capacity(self.composition.len());
        for lead in ["C", "H"] {
            if let Some((element, &count)) = self.composition.get_key_value(lead) {
                ordered.push((element, count));
            }
        }
        ordered.extend(
            self.composition
                .iter()
                .filter(|(e, _)| !matches!(e.symbol(), "C" | "H"))
                .map(|(e, &n)| (e, n)),
        );
        ordered
    }

    pub fn hill_formula(&self) -> String {
        let mut formula = String::new();
        for (element, count) in self.hill_order() {
            formula.push_str(element.symbol());
            if count != 1 {
                formula.push_str(&count.to_string());
            }
        }
        formula
    }

    /// Sum of standard atomic weights, or `None` if any element is not in the periodic table.
    pub fn mass(&self) -> Option<f64> {
        self.composition.iter().try_fold(0.0, |acc, (element, &count)| {
            element
                .standard_atomic_weight()
                .map(|w| acc + w * f64::from(count))
        })
    }
}

impl FromStr for Ion {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_formula(s)
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hill_formula())
    }
}

struct FormulaParser<'a> {
    formula: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> FormulaParser<'a> {
    fn new(formula: &'a str) -> Self {
        Self {
            formula,
            chars: formula.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<BTreeMap<Element, u32>, FormulaError> {
        let composition = self.parse_group(0)?;
        if self.pos < self.chars.len() {
            return Err(FormulaError::UnbalancedParentheses(self.formula.to_string()));
        }
        Ok(composition)
    }

    fn parse_group(&mut self, depth: usize) -> Result<BTreeMap<Element, u32>, FormulaError> {
        let mut group: BTreeMap<Element, u32> = BTreeMap::new();
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                ')' => {
                    if depth == 0 {
                        return Err(FormulaError::UnbalancedParentheses(self.formula.to_string()));
                    }
                    return Ok(group);
                }
                '(' => {
                    self.pos += 1;
                    let inner = self.parse_group(depth + 1)?;
                    if self.chars.get(self.pos) != Some(&')') {
                        return Err(FormulaError::UnbalancedParentheses(self.formula.to_string()));
                    }
                    self.pos += 1;
                    let multiplier = self.parse_count()?;
                    for (element, count) in inner {
                        let scaled = count
                            .checked_mul(multiplier)
                            .ok_or_else(|| self.overflow())?;
                        self.accumulate(&mut group, element, scaled)?;
                    }
                }
                c if c.is_ascii_uppercase() => {
                    let start = self.pos;
                    self.pos += 1;
                    while self
                        .chars
                        .get(self.pos)
                        .is_some_and(|ch| ch.is_ascii_lowercase())
                    {
                        self.pos += 1;
                    }
                    let symbol: String = self.chars[start..self.pos].iter().collect();
                    let element = Element::new(&symbol)?;
                    let count = self.parse_count()?;
                    self.accumulate(&mut group, element, count)?;
                }
                other => {
                    return Err(FormulaError::UnexpectedCharacter {
                        formula: self.formula.to_string(),
                        character: other,
                        position: self.pos,
                    });
                }
            }
        }
        if depth > 0 {
            return Err(FormulaError::UnbalancedParentheses(self.formula.to_string()));
        }
        Ok(group)
    }

    fn parse_count(&mut self) -> Result<u32, FormulaError> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(digit) = self.chars.get(self.pos).and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or_else(|| self.overflow())?;
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(1);
        }
        if value == 0 {
            return Err(FormulaError::ZeroCount {
                formula: self.formula.to_string(),
                position: start,
            });
        }
        Ok(value)
    }

    fn accumulate(
        &self,
        group: &mut BTreeMap<Element, u32>,
        element: Element,
        count: u32,
    ) -> Result<(), FormulaError> {
        let entry = group.entry(element).or_insert(0);
        *entry = entry.checked_add(count).ok_or_else(|| self.overflow())?;
        Ok(())
    }

    fn overflow(&self) -> FormulaError {
        FormulaError::CountOverflow(self.formula.to_string())
    }
}
