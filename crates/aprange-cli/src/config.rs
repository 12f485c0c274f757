//! Layered CLI configuration: built-in defaults, then an optional TOML file, then
//! `-S key=value` overrides. Subcommand flags are applied last by each command.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
