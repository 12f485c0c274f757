use crate::core::models::collection::RangeCollection;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing range-definition file formats.
///
/// Implementors handle format-specific parsing and serialization; the path based
/// helpers are provided on top of the reader/writer methods.
pub trait RangeFile {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a validated range collection from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, a range is invalid, ranges overlap, or
    /// the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<RangeCollection, Self::Error>;

    /// Writes a range collection to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(collection: &RangeCollection, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a range collection from a file path.
    ///
    /// The returned collection carries no provenance; use
    /// [`RangeCollection::from_rrng`] to record the source path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<RangeCollection, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a range collection to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        collection: &RangeCollection,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(collection, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
