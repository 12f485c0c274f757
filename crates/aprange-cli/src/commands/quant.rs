use super::load_collection;
use crate::cli::QuantArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::parser;
use crate::utils::progress::QuantProgress;
use aprange::core::io::table::read_mass_column;
use aprange::engine::config::{RangingConfig, RangingConfigBuilder};
use aprange::engine::progress::ProgressReporter;
use aprange::workflows::{self, ranging::RangingResult};
use std::fmt::Write;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub fn run(args: QuantArgs, config: &AppConfig, show_progress: bool) -> Result<()> {
    let ranging = merge_ranging(&args, &config.quant.ranging)?;
    let column = args
        .column
        .as_deref()
        .unwrap_or(config.quant.mass_column.as_str());

    let collection = load_collection(&args.input)?;
    let masses = read_masses(&args.masses, column)?;

    let progress_handler = if show_progress {
        QuantProgress::new()
    } else {
        QuantProgress::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core ranging workflow...");
    let result = workflows::ranging::run(&masses, &collection, &ranging, &reporter)?;

    print!("{}", render(&result, config.output.precision));
    Ok(())
}

fn merge_ranging(args: &QuantArgs, configured: &RangingConfig) -> Result<RangingConfig> {
    let window = match &args.window {
        Some(text) => {
            Some(parser::parse_mass_window(text).map_err(|e| CliError::Argument(e.to_string()))?)
        }
        None => configured.mass_window,
    };

    let mut builder =
        RangingConfigBuilder::new().decompose(configured.decompose && !args.no_decompose);
    if let Some((min, max)) = window {
        builder = builder.mass_window(min, max);
    }
    builder
        .build()
        .map_err(|e| CliError::Argument(e.to_string()))
}

fn read_masses(path: &Path, column: &str) -> Result<Vec<f64>> {
    info!("Reading column '{}' from {:?}", column, path);
    let file = File::open(path)?;
    read_mass_column(BufReader::new(file), column).map_err(|e| CliError::file_parsing(path, e))
}

pub(crate) fn render(result: &RangingResult, precision: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total:    {}", result.total);
    let _ = writeln!(out, "Excluded: {}", result.excluded);
    let _ = writeln!(out, "Ranged:   {}", result.ranged);
    let _ = writeln!(out, "Unranged: {}", result.unranged);

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<10} {:>12} {:>12}", "Ion", "Count", "Fraction");
    for ion in &result.ions {
        let _ = writeln!(
            out,
            "{:<10} {:>12} {:>12.prec$}",
            ion.ion.hill_formula(),
            ion.count,
            ion.fraction,
            prec = precision
        );
    }

    if !result.elements.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<10} {:>12} {:>12}", "Element", "Atoms", "Fraction");
        for element in &result.elements {
            let _ = writeln!(
                out,
                "{:<10} {:>12} {:>12.prec$}",
                element.element.symbol(),
                element.count,
                element.fraction,
                prec = precision
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::config::build_config;
    use tempfile::tempdir;

    fn quant_args(input: &Path, masses: &Path) -> QuantArgs {
        QuantArgs {
            input: input.to_path_buf(),
            masses: masses.to_path_buf(),
            window: None,
            column: None,
            no_decompose: false,
        }
    }

    #[test]
    fn merge_ranging_prefers_cli_window_and_flags() {
        let config = build_config(
            None,
            &[
                "quant.mass-window.min=1".to_string(),
                "quant.mass-window.max=2".to_string(),
            ],
        )
        .unwrap();
        let mut args = quant_args(Path::new("r.rrng"), Path::new("m.csv"));

        let merged = merge_ranging(&args, &config.quant.ranging).unwrap();
        assert_eq!(merged.mass_window, Some((1.0, 2.0)));
        assert!(merged.decompose);

        args.window = Some("10:80".to_string());
        args.no_decompose = true;
        let merged = merge_ranging(&args, &config.quant.ranging).unwrap();
        assert_eq!(merged.mass_window, Some((10.0, 80.0)));
        assert!(!merged.decompose);
    }

    #[test]
    fn merge_ranging_rejects_bad_windows() {
        let config = build_config(None, &[]).unwrap();
        let mut args = quant_args(Path::new("r.rrng"), Path::new("m.csv"));
        for bad in ["80:10", "ten:20", "1020"] {
            args.window = Some(bad.to_string());
            assert!(
                matches!(merge_ranging(&args, &config.quant.ranging), Err(CliError::Argument(_))),
                "window {bad}"
            );
        }
    }

    #[test]
    fn run_ranges_masses_from_csv() {
        let dir = tempdir().unwrap();
        let input = write_file(&dir, "sample.rrng", SAMPLE_RRNG);
        let masses = write_file(&dir, "masses.csv", "mz\n26.0\n34.0\n56.0\n99.0\n");
        let config = build_config(None, &["quant.mass-column=mz".to_string()]).unwrap();

        run(quant_args(&input, &masses), &config, false).unwrap();
    }

    #[test]
    fn run_reports_missing_column() {
        let dir = tempdir().unwrap();
        let input = write_file(&dir, "sample.rrng", SAMPLE_RRNG);
        let masses = write_file(&dir, "masses.csv", "mz\n26.0\n");
        let config = build_config(None, &[]).unwrap();

        let result = run(quant_args(&input, &masses), &config, false);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn render_prints_ion_and_element_tables() {
        let dir = tempdir().unwrap();
        let input = write_file(&dir, "sample.rrng", SAMPLE_RRNG);
        let collection = load_collection(&input).unwrap();
        let result = workflows::ranging::run(
            &[26.0, 34.0, 56.0, 99.0],
            &collection,
            &RangingConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let text = render(&result, 3);
        assert!(text.contains("Ranged:   3"));
        assert!(text.contains("Unranged: 1"));
        assert!(text.lines().any(|l| l.starts_with("CrO") && l.ends_with("0.333")));
        assert!(text.lines().any(|l| l.starts_with("Cr ") && l.trim_end().ends_with("0.500")));
        assert!(text.contains("Element"));
    }
}
