use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileMassWindow};
use super::models::{AppConfig, OutputSettings, QuantSettings};
use crate::error::{CliError, Result};
use aprange::engine::config::RangingConfigBuilder;
use std::path::Path;
use std::str::FromStr;

pub fn build_config(config_path: Option<&Path>, set_values: &[String]) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(path) = config_path {
        FileConfig::from_file(path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, set_values)?;

    let output_file = file_config.output.unwrap_or_default();
    let output = OutputSettings {
        precision: output_file.precision.unwrap_or(defaults.precision),
        sorted: output_file.sorted.unwrap_or(defaults.sorted),
    };

    let quant_file = file_config.quant.unwrap_or_default();
    let mut ranging = RangingConfigBuilder::new()
        .decompose(quant_file.decompose.unwrap_or(defaults.decompose));
    if let Some((min, max)) = merge_mass_window(quant_file.mass_window)? {
        ranging = ranging.mass_window(min, max);
    }
    let ranging = ranging
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        output,
        quant: QuantSettings {
            mass_column: quant_file.mass_column.unwrap_or(defaults.mass_column),
            ranging,
        },
    })
}

fn merge_mass_window(window: Option<FileMassWindow>) -> Result<Option<(f64, f64)>> {
    match window {
        None => Ok(None),
        Some(FileMassWindow {
            min: Some(min),
            max: Some(max),
        }) => Ok(Some((min, max))),
        Some(_) => Err(CliError::Config(
            "`quant.mass-window` requires both `min` and `max`".to_string(),
        )),
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "output.precision" => {
                config.output.get_or_insert_with(Default::default).precision =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "output.sorted" => {
                config.output.get_or_insert_with(Default::default).sorted =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "quant.decompose" => {
                config.quant.get_or_insert_with(Default::default).decompose =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "quant.mass-column" => {
                config.quant.get_or_insert_with(Default::default).mass_column =
                    Some(value_str.trim().to_string());
            }
            "quant.mass-window.min" => {
                config
                    .quant
                    .get_or_insert_with(Default::default)
                    .mass_window
                    .get_or_insert_with(Default::default)
                    .min = Some(parse_value(key, value_str, "float")?);
            }
            "quant.mass-window.max" => {
                config
                    .quant
                    .get_or_insert_with(Default::default)
                    .mass_window
                    .get_or_insert_with(Default::default)
                    .max = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aprange.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn set(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn build_config_without_file_uses_defaults() {
        let config = build_config(None, &[]).unwrap();
        assert_eq!(config.output.precision, 4);
        assert!(config.output.sorted);
        assert_eq!(config.quant.mass_column, "mass");
        assert!(config.quant.ranging.decompose);
        assert_eq!(config.quant.ranging.mass_window, None);
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let (_dir, path) = write_config(
            r#"
            [output]
            sorted = false

            [quant]
            mass-column = "mz"

            [quant.mass-window]
            min = 10.0
            max = 80.0
            "#,
        );
        let config = build_config(Some(&path), &[]).unwrap();
        assert_eq!(config.output.precision, 4);
        assert!(!config.output.sorted);
        assert_eq!(config.quant.mass_column, "mz");
        assert_eq!(config.quant.ranging.mass_window, Some((10.0, 80.0)));
        assert!(config.quant.ranging.decompose);
    }

    #[test]
    fn set_values_override_file() {
        let (_dir, path) = write_config("[output]\nprecision = 2\n[quant]\ndecompose = true\n");
        let config = build_config(
            Some(&path),
            &set(&[
                "output.precision=6",
                "quant.decompose=false",
                "quant.mass-window.min=1.5",
                "quant.mass-window.max=60",
                "quant.mass-column= Da ",
            ]),
        )
        .unwrap();
        assert_eq!(config.output.precision, 6);
        assert!(!config.quant.ranging.decompose);
        assert_eq!(config.quant.ranging.mass_window, Some((1.5, 60.0)));
        assert_eq!(config.quant.mass_column, "Da");
    }

    #[test]
    fn set_values_report_bad_input() {
        for bad in [
            "output.precision",
            "output.precision=two",
            "output.sorted=maybe",
            "output.colour=red",
        ] {
            let result = build_config(None, &set(&[bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "input: {bad}");
        }
    }

    #[test]
    fn half_specified_window_is_rejected() {
        let result = build_config(None, &set(&["quant.mass-window.min=10"]));
        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("mass-window")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn inverted_window_is_rejected() {
        let (_dir, path) = write_config("[quant.mass-window]\nmin = 80.0\nmax = 10.0\n");
        let result = build_config(Some(&path), &[]);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
