use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
};

/// Top-level modules of the `aprange` library. The binary is also named `aprange`,
/// so library events are told apart from command events by module prefix.
const LIBRARY_TARGETS: [&str; 3] = ["aprange::core", "aprange::engine", "aprange::workflows"];

/// Separate thresholds for the commands' own events and the library's.
///
/// RRNG irregularities are library warnings and show at the default verbosity.
/// Each `-v` raises the command output first; the library follows one step behind,
/// so `-vv` adds workflow milestones and `-vvv` adds per-file load and write details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevels {
    pub cli: LevelFilter,
    pub library: LevelFilter,
}

impl LogLevels {
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        if quiet {
            return Self {
                cli: LevelFilter::OFF,
                library: LevelFilter::OFF,
            };
        }
        let (cli, library) = match verbosity {
            0 => (LevelFilter::WARN, LevelFilter::WARN),
            1 => (LevelFilter::INFO, LevelFilter::WARN),
            2 => (LevelFilter::DEBUG, LevelFilter::INFO),
            3 => (LevelFilter::TRACE, LevelFilter::DEBUG),
            _ => (LevelFilter::TRACE, LevelFilter::TRACE),
        };
        Self { cli, library }
    }

    pub fn targets(&self) -> Targets {
        LIBRARY_TARGETS
            .iter()
            .fold(Targets::new().with_default(self.cli), |targets, prefix| {
                targets.with_target(*prefix, self.library)
            })
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let levels = LogLevels::from_flags(verbosity, quiet);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(&path).map_err(CliError::Io)?;
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(levels.targets())
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
