use aprange::engine::config::RangingConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Decimal places used when printing masses and fractions.
    pub precision: usize,
    /// Whether listings order ranges by lower bound instead of file order.
    pub sorted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuantSettings {
    pub mass_column: String,
    pub ranging: RangingConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub output: OutputSettings,
    pub quant: QuantSettings,
}
