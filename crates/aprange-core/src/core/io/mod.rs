//! Reading and writing range definitions and tabular data.
//!
//! Range file formats implement the [`traits::RangeFile`] trait; CSV helpers for
//! exporting range tables and importing mass spectra live in [`table`].

pub mod rrng;
pub mod table;
pub mod traits;
