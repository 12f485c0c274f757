pub struct DefaultsConfig {
    pub precision: usize,
    pub sorted: bool,
    pub decompose: bool,
    pub mass_column: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            precision: 4,
            sorted: true,
            decompose: true,
            mass_column: "mass".to_string(),
        }
    }
}
