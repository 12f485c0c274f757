//! # Core Module
//!
//! Data models and file formats for mass ranges.
//!
//! - **Models** ([`models`]) - Elements, ions, colors, single ranges and validated
//!   collections of ranges
//! - **File I/O** ([`io`]) - The `.RRNG` range format and CSV tables

pub mod io;
pub mod models;
