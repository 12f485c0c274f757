use crate::core::io::traits::RangeFile;
use crate::core::models::collection::{CollectionError, RangeCollection};
use crate::core::models::element::Element;
use crate::core::models::ion::{FormulaError, Ion};
use crate::core::models::range::{Range, RangeError};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum RrngError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: RrngParseErrorKind,
    },
    #[error("Invalid range on line {line}: {source}")]
    InvalidRange {
        line: usize,
        #[source]
        source: RangeError,
    },
    #[error("Inconsistent range definitions: {0}")]
    Collection(#[from] CollectionError),
    #[error("Missing required section: [{0}]")]
    MissingSection(&'static str),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RrngParseErrorKind {
    #[error("Entry appears before any section header: '{0}'")]
    OutsideSection(String),
    #[error("Malformed section header: '{0}'")]
    MalformedHeader(String),
    #[error("Malformed entry, expected KEY=VALUE: '{0}'")]
    MalformedEntry(String),
    #[error("Invalid entry count '{0}'")]
    InvalidNumber(String),
    #[error("Range definition requires a lower and an upper bound")]
    MissingBounds,
    #[error("Invalid decimal value '{0}'")]
    InvalidFloat(String),
    #[error("Malformed range field '{0}', expected KEY:VALUE")]
    MalformedField(String),
    #[error("Invalid count '{value}' for element '{element}'")]
    InvalidCount { element: String, value: String },
    #[error("Range definition has no ion composition")]
    MissingComposition,
    #[error("Invalid ion composition: {0}")]
    Formula(#[from] FormulaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Ions,
    Ranges,
    Other,
}

/// Reader and writer for the IVAS `.RRNG` range-definition format.
///
/// ```text
/// [Ions]
/// Number=1
/// Ion1=CrO
/// [Ranges]
/// Number=1
/// Range1=33.9000 34.1000 Vol:0.0200 Cr:1 O:1 Color:FF00FF
/// ```
pub struct RrngFile;

impl RangeFile for RrngFile {
    type Error = RrngError;

    fn read_from(reader: &mut impl BufRead) -> Result<RangeCollection, Self::Error> {
        let mut section = Section::Preamble;
        let mut saw_ranges_section = false;
        let mut declared_ions: Option<usize> = None;
        let mut declared_ranges: Option<usize> = None;
        let mut ion_entries = 0usize;
        let mut ranges = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let raw = line_res?;
            let line_num = line_num + 1;
            let line = raw.trim_start_matches('\u{feff}').trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                let name = line
                    .strip_prefix('[')
                    .and_then(|l| l.strip_suffix(']'))
                    .ok_or_else(|| RrngError::Parse {
                        line: line_num,
                        kind: RrngParseErrorKind::MalformedHeader(line.to_string()),
                    })?
                    .trim();
                section = match name.to_ascii_lowercase().as_str() {
                    "ions" => Section::Ions,
                    "ranges" => {
                        saw_ranges_section = true;
                        Section::Ranges
                    }
                    _ => {
                        warn!(line = line_num, "Skipping unknown RRNG section [{}]", name);
                        Section::Other
                    }
                };
                continue;
            }

            match section {
                Section::Preamble => {
                    return Err(RrngError::Parse {
                        line: line_num,
                        kind: RrngParseErrorKind::OutsideSection(line.to_string()),
                    });
                }
                Section::Other => continue,
                Section::Ions | Section::Ranges => {}
            }

            let (key, value) = line.split_once('=').ok_or_else(|| RrngError::Parse {
                line: line_num,
                kind: RrngParseErrorKind::MalformedEntry(line.to_string()),
            })?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            if key == "number" {
                let count: usize = value.parse().map_err(|_| RrngError::Parse {
                    line: line_num,
                    kind: RrngParseErrorKind::InvalidNumber(value.to_string()),
                })?;
                if section == Section::Ions {
                    declared_ions = Some(count);
                } else {
                    declared_ranges = Some(count);
                }
                continue;
            }

            match section {
                Section::Ions if key.starts_with("ion") => ion_entries += 1,
                Section::Ranges if key.starts_with("range") => {
                    ranges.push(parse_range_entry(value, line_num)?);
                }
                _ => {
                    warn!(line = line_num, "Skipping unrecognized RRNG entry '{}'", line);
                }
            }
        }

        if !saw_ranges_section {
            return Err(RrngError::MissingSection("Ranges"));
        }
        if let Some(declared) = declared_ions.filter(|&n| n != ion_entries) {
            warn!(
                "RRNG [Ions] declares Number={} but lists {} ion(s)",
                declared, ion_entries
            );
        }
        if let Some(declared) = declared_ranges.filter(|&n| n != ranges.len()) {
            warn!(
                "RRNG [Ranges] declares Number={} but lists {} range(s)",
                declared,
                ranges.len()
            );
        }

        debug!("Parsed {} RRNG range definition(s)", ranges.len());
        Ok(RangeCollection::from_ranges(ranges)?)
    }

    fn write_to(collection: &RangeCollection, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut ions: Vec<&Ion> = Vec::new();
        for range in collection {
            if !ions.contains(&range.ion()) {
                ions.push(range.ion());
            }
        }

        writeln!(writer, "[Ions]")?;
        writeln!(writer, "Number={}", ions.len())?;
        for (i, ion) in ions.iter().enumerate() {
            writeln!(writer, "Ion{}={}", i + 1, ion)?;
        }

        writeln!(writer, "[Ranges]")?;
        writeln!(writer, "Number={}", collection.len())?;
        for (i, range) in collection.iter().enumerate() {
            write!(
                writer,
                "Range{}={} {} Vol:{}",
                i + 1,
                format_decimal(range.lower()),
                format_decimal(range.upper()),
                format_decimal(range.volume())
            )?;
            for (element, count) in range.ion().hill_order() {
                write!(writer, " {}:{}", element, count)?;
            }
            writeln!(writer, " Color:{}", range.color().to_hex())?;
        }

        debug!("Wrote {} RRNG range definition(s)", collection.len());
        Ok(())
    }
}

fn parse_range_entry(value: &str, line: usize) -> Result<Range, RrngError> {
    let parse_err = |kind: RrngParseErrorKind| RrngError::Parse { line, kind };

    let mut tokens = value.split_whitespace();
    let mut next_bound = || -> Result<f64, RrngError> {
        let token = tokens
            .next()
            .ok_or_else(|| parse_err(RrngParseErrorKind::MissingBounds))?;
        parse_decimal(token).ok_or_else(|| parse_err(RrngParseErrorKind::InvalidFloat(token.to_string())))
    };
    let lower = next_bound()?;
    let upper = next_bound()?;

    let mut volume = None;
    let mut color = None;
    let mut name = None;
    let mut composition = Vec::new();

    for token in tokens {
        let (key, field) = token
            .split_once(':')
            .ok_or_else(|| parse_err(RrngParseErrorKind::MalformedField(token.to_string())))?;
        match key.to_ascii_lowercase().as_str() {
            "vol" => {
                volume = Some(parse_decimal(field).ok_or_else(|| {
                    parse_err(RrngParseErrorKind::InvalidFloat(field.to_string()))
                })?);
            }
            "color" => color = Some(field.to_string()),
            "name" => name = Some(field.to_string()),
            _ => {
                let element = Element::new(key)
                    .map_err(|e| parse_err(RrngParseErrorKind::Formula(e.into())))?;
                let count: u32 = field.parse().map_err(|_| {
                    parse_err(RrngParseErrorKind::InvalidCount {
                        element: key.to_string(),
                        value: field.to_string(),
                    })
                })?;
                // Some exporters list every element of the [Ions] block with a zero count.
                if count > 0 {
                    composition.push((element, count));
                }
            }
        }
    }

    let ion = if composition.is_empty() {
        let name = name.ok_or_else(|| parse_err(RrngParseErrorKind::MissingComposition))?;
        Ion::from_formula(&name).map_err(|e| parse_err(e.into()))?
    } else {
        Ion::from_composition(composition).map_err(|e| parse_err(e.into()))?
    };

    let invalid = |source: RangeError| RrngError::InvalidRange { line, source };
    let mut range = Range::new(ion, (lower, upper)).map_err(invalid)?;
    if let Some(volume) = volume {
        range.set_volume(volume).map_err(invalid)?;
    }
    if let Some(color) = color {
        range.set_color(color).map_err(invalid)?;
    }
    Ok(range)
}

fn parse_decimal(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// Four decimals like instrument software writes them, unless that would lose precision.
fn format_decimal(value: f64) -> String {
    let fixed = format!("{:.4}", value);
    if fixed.parse::<f64>() == Ok(value) {
        fixed
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::color::Color;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
[Ions]
Number=2
Ion1=Cr
Ion2=CrO
[Ranges]
Number=3
Range1=25.9000 26.1000 Vol:0.01205 Cr:1 Color:33FFFF
Range2=33.9000 34.1000 Vol:0.02 Cr:1 O:1 Color:FF00FF
Range3=51.9000 52.1000 Vol:0.01205 Cr:1 Color:33FFFF
";

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/steel_25.rrng")
    }

    fn read_str(content: &str) -> Result<RangeCollection, RrngError> {
        RrngFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn read_from_parses_ranges_in_file_order() {
        let collection = read_str(SAMPLE).unwrap();
        assert_eq!(collection.len(), 3);

        let first = &collection.ranges()[0];
        assert_eq!(first.interval(), (25.9, 26.1));
        assert_eq!(first.volume(), 0.01205);
        assert_eq!(first.color(), Color::from_hex("33FFFF").unwrap());
        assert_eq!(first.hill_formula(), "Cr");

        let second = &collection.ranges()[1];
        assert_eq!(second.hill_formula(), "CrO");
        assert_eq!(second.ion().count_of("O"), 1);
        assert_eq!(collection.filepath(), None);
    }

    #[test]
    fn read_from_uses_defaults_for_missing_volume_and_color() {
        let collection = read_str("[Ranges]\nNumber=1\nRange1=1.0 2.0 H:2\n").unwrap();
        let range = &collection.ranges()[0];
        assert_eq!(range.volume(), 1.0);
        assert_eq!(range.color(), Color::BLACK);
        assert_eq!(range.hill_formula(), "H2");
    }

    #[test]
    fn read_from_is_lenient_about_layout() {
        let content = "\u{feff}; exported by instrument software\n\n[ions]\nnumber=1\nion1=O\n\n[Misc]\nAnything=goes\n[RANGES]\nNUMBER=1\nrange1 = 15.9 16.1 vol:0.5 O:1 color:ff0000\n";
        let collection = read_str(content).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.ranges()[0].volume(), 0.5);
        assert_eq!(
            collection.ranges()[0].color(),
            Color::new(1.0, 0.0, 0.0).unwrap()
        );
    }

    #[test]
    fn read_from_falls_back_to_name_field() {
        let collection = read_str("[Ranges]\nRange1=1.0 2.0 Name:SiO2\n").unwrap();
        assert_eq!(collection.ranges()[0].hill_formula(), "O2Si");
    }

    #[test]
    fn read_from_ignores_zero_counts() {
        let collection = read_str("[Ranges]\nRange1=1.0 2.0 Cr:0 O:1\n").unwrap();
        assert_eq!(collection.ranges()[0].hill_formula(), "O");
    }

    #[test]
    fn read_from_tolerates_number_mismatch() {
        let collection = read_str("[Ranges]\nNumber=5\nRange1=1.0 2.0 O:1\n").unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn read_from_accepts_empty_ranges_section() {
        let collection = read_str("[Ions]\nNumber=0\n[Ranges]\nNumber=0\n").unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn read_from_fails_without_ranges_section() {
        let result = read_str("[Ions]\nNumber=1\nIon1=O\n");
        assert!(matches!(result, Err(RrngError::MissingSection("Ranges"))));
    }

    #[test]
    fn read_from_rejects_overlapping_ranges() {
        let result = read_str("[Ranges]\nRange1=1.0 2.0 O:1\nRange2=1.5 2.5 H:1\n");
        assert!(matches!(
            result,
            Err(RrngError::Collection(CollectionError::Overlap { .. }))
        ));
    }

    #[test]
    fn read_from_reports_line_numbers_for_parse_errors() {
        let cases = [
            ("Range1=1.0 2.0 O:1\n", 1, "outside"),
            ("[Ranges]\nRange1 1.0 2.0 O:1\n", 2, "entry"),
            ("[Ranges]\nRange1=1.0\n", 2, "bounds"),
            ("[Ranges]\nRange1=abc 2.0 O:1\n", 2, "float"),
            ("[Ranges]\n\nRange1=1.0 2.0 O\n", 3, "field"),
            ("[Ranges]\nRange1=1.0 2.0 O:x\n", 2, "count"),
            ("[Ranges]\nRange1=1.0 2.0 Vol:0.1\n", 2, "composition"),
            ("[Ranges]\nNumber=many\n", 2, "number"),
            ("[Ranges\n", 1, "header"),
        ];
        for (content, expected_line, label) in cases {
            match read_str(content) {
                Err(RrngError::Parse { line, kind }) => {
                    assert_eq!(line, expected_line, "case {label}");
                    let matched = match label {
                        "outside" => matches!(kind, RrngParseErrorKind::OutsideSection(_)),
                        "entry" => matches!(kind, RrngParseErrorKind::MalformedEntry(_)),
                        "bounds" => kind == RrngParseErrorKind::MissingBounds,
                        "float" => matches!(kind, RrngParseErrorKind::InvalidFloat(_)),
                        "field" => matches!(kind, RrngParseErrorKind::MalformedField(_)),
                        "count" => matches!(kind, RrngParseErrorKind::InvalidCount { .. }),
                        "composition" => kind == RrngParseErrorKind::MissingComposition,
                        "number" => matches!(kind, RrngParseErrorKind::InvalidNumber(_)),
                        "header" => matches!(kind, RrngParseErrorKind::MalformedHeader(_)),
                        _ => false,
                    };
                    assert!(matched, "case {label}: unexpected kind {kind:?}");
                }
                other => panic!("case {label}: expected parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn read_from_reports_invalid_range_values() {
        let result = read_str("[Ranges]\nRange1=2.0 1.0 O:1\n");
        assert!(matches!(
            result,
            Err(RrngError::InvalidRange {
                line: 2,
                source: RangeError::EmptyInterval { .. }
            })
        ));

        let result = read_str("[Ranges]\nRange1=1.0 2.0 Vol:0 O:1\n");
        assert!(matches!(
            result,
            Err(RrngError::InvalidRange {
                source: RangeError::InvalidVolume { .. },
                ..
            })
        ));

        let result = read_str("[Ranges]\nRange1=1.0 2.0 O:1 Color:XYZ\n");
        assert!(matches!(
            result,
            Err(RrngError::InvalidRange {
                source: RangeError::Color(_),
                ..
            })
        ));
    }

    #[test]
    fn write_to_round_trips_through_read_from() {
        let original = read_str(SAMPLE).unwrap();
        let mut buffer = Vec::new();
        RrngFile::write_to(&original, &mut buffer).unwrap();
        let written = String::from_utf8(buffer.clone()).unwrap();

        assert!(written.starts_with("[Ions]\nNumber=2\nIon1=Cr\nIon2=CrO\n[Ranges]\nNumber=3\n"));
        assert!(written.contains("Range2=33.9000 34.1000 Vol:0.0200 Cr:1 O:1 Color:FF00FF"));
        assert!(written.contains("Range1=25.9000 26.1000 Vol:0.01205 Cr:1 Color:33FFFF"));

        let reread = RrngFile::read_from(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(reread, original);
    }

    #[test]
    fn format_decimal_keeps_full_precision_when_needed() {
        assert_eq!(format_decimal(26.1), "26.1000");
        assert_eq!(format_decimal(1.0), "1.0000");
        assert_eq!(format_decimal(0.123456), "0.123456");
    }

    #[test]
    fn fixture_with_25_ranges_loads_in_order() {
        let path = fixture_path();
        let collection = RangeCollection::from_rrng(&path).unwrap();

        assert_eq!(collection.len(), 25);
        assert_eq!(collection.filepath(), Some(path.as_path()));
        assert_eq!(
            collection.ranges()[0].ion(),
            &Ion::from_formula("H").unwrap()
        );
        assert_eq!(
            collection.ranges()[24].ion(),
            &Ion::from_formula("CrO").unwrap()
        );
        assert_eq!(collection.ions().len(), 15);
        assert!(collection.contains_mass(27.95));
        assert_eq!(collection.find_by_mass(34.0).unwrap().hill_formula(), "CrO");
    }

    #[test]
    fn from_rrng_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = RangeCollection::from_rrng(dir.path().join("missing.rrng"));
        assert!(matches!(result, Err(RrngError::Io(_))));
    }

    #[test]
    fn write_rrng_then_from_rrng_round_trips_fixture() {
        let original = RangeCollection::from_rrng(fixture_path()).unwrap();
        let dir = tempdir().unwrap();
        let out_path = dir.path().join("copy.rrng");
        original.write_rrng(&out_path).unwrap();

        let copy = RangeCollection::from_rrng(&out_path).unwrap();
        assert_eq!(copy.ranges(), original.ranges());
        assert_eq!(copy.filepath(), Some(out_path.as_path()));
    }

    #[test]
    fn rgb_colors_survive_write_and_reload() {
        let original = RangeCollection::from_ranges(vec![
            Range::new("CrO", (33.9, 34.1))
                .unwrap()
                .with_color((0.5, 0.2, 0.7))
                .unwrap(),
        ])
        .unwrap();
        let dir = tempdir().unwrap();
        let out_path = dir.path().join("rgb.rrng");
        original.write_rrng(&out_path).unwrap();

        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.contains("Color:8033B3"));

        let copy = RangeCollection::from_rrng(&out_path).unwrap();
        assert_eq!(copy.ranges(), original.ranges());
        assert_eq!(copy.ranges()[0].color(), Color::from_hex("8033B3").unwrap());
    }
}
