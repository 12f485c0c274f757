use crate::core::models::collection::RangeCollection;
use crate::core::models::range::Range;
use serde::Serialize;
use std::io::{Read, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
    #[error("Column '{0}' not found in CSV header")]
    MissingColumn(String),
    #[error("Invalid mass-to-charge value '{value}' on data row {row}")]
    InvalidMass { row: usize, value: String },
}

#[derive(Debug, Serialize)]
struct RangeRow {
    index: usize,
    ion: String,
    lower: f64,
    upper: f64,
    volume: f64,
    color: String,
    num_elements: usize,
}

impl RangeRow {
    fn new(index: usize, range: &Range) -> Self {
        Self {
            index,
            ion: range.hill_formula(),
            lower: range.lower(),
            upper: range.upper(),
            volume: range.volume(),
            color: range.color().to_hex(),
            num_elements: range.num_elements(),
        }
    }
}

/// Writes one CSV row per range, in collection order, with a header row.
///
/// `index` is 1-based, matching the `RangeN` numbering of RRNG files.
pub fn write_range_table<W: Write>(
    collection: &RangeCollection,
    writer: W,
) -> Result<(), TableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, range) in collection.iter().enumerate() {
        csv_writer.serialize(RangeRow::new(i + 1, range))?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    debug!("Wrote CSV table for {} range(s)", collection.len());
    Ok(())
}

/// Reads the mass-to-charge values of `column` from a headered CSV.
///
/// The column name is matched after trimming surrounding whitespace.
pub fn read_mass_column<R: Read>(reader: R, column: &str) -> Result<Vec<f64>, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let position = csv_reader
        .headers()?
        .iter()
        .position(|h| h == column.trim())
        .ok_or_else(|| TableError::MissingColumn(column.to_string()))?;

    let mut masses = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let value = record.get(position).unwrap_or_default();
        let mass = value.parse::<f64>().map_err(|_| TableError::InvalidMass {
            row: row + 1,
            value: value.to_string(),
        })?;
        masses.push(mass);
    }

    debug!("Read {} mass value(s) from column '{}'", masses.len(), column);
    Ok(masses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn collection() -> RangeCollection {
        RangeCollection::from_ranges(vec![
            Range::new("Cr", (25.9, 26.1))
                .unwrap()
                .with_color("33FFFF")
                .unwrap(),
            Range::new("CrO", (33.9, 34.1))
                .unwrap()
                .with_volume(0.02)
                .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn write_range_table_emits_header_and_rows() {
        let mut buffer = Vec::new();
        write_range_table(&collection(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "index,ion,lower,upper,volume,color,num_elements"
        );
        assert_eq!(lines[1], "1,Cr,25.9,26.1,1.0,33FFFF,1");
        assert_eq!(lines[2], "2,CrO,33.9,34.1,0.02,000000,2");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn write_range_table_for_empty_collection_writes_nothing() {
        let mut buffer = Vec::new();
        write_range_table(&RangeCollection::new(), &mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn read_mass_column_parses_named_column() {
        let data = "x, y ,mass\n1,2,12.5\n3,4, 27.95\n";
        let masses = read_mass_column(Cursor::new(data), "mass").unwrap();
        assert_eq!(masses, vec![12.5, 27.95]);

        let ys = read_mass_column(Cursor::new(data), "y").unwrap();
        assert_eq!(ys, vec![2.0, 4.0]);
    }

    #[test]
    fn read_mass_column_reports_missing_column() {
        let result = read_mass_column(Cursor::new("a,b\n1,2\n"), "mass");
        assert!(matches!(result, Err(TableError::MissingColumn(c)) if c == "mass"));
    }

    #[test]
    fn read_mass_column_reports_invalid_value_with_row() {
        let result = read_mass_column(Cursor::new("mass\n1.0\nabc\n"), "mass");
        match result {
            Err(TableError::InvalidMass { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected invalid mass error, got {other:?}"),
        }
    }

    #[test]
    fn read_mass_column_reads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masses.csv");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "mass").unwrap();
            for mass in [1.0, 14.0, 56.0] {
                writeln!(file, "{mass}").unwrap();
            }
        }
        let masses = read_mass_column(File::open(&path).unwrap(), "mass").unwrap();
        assert_eq!(masses, vec![1.0, 14.0, 56.0]);
    }
}
