//! # aprange Core Library
//!
//! Mass-to-charge range definitions for atom probe tomography: named, non-overlapping
//! intervals on the mass spectrum that map each detected ion to a chemical identity.
//!
//! ## Architecture
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Element`, `Ion`, `Color`,
//!   `Range`, `RangeCollection`) and I/O for `.RRNG` range files and CSV tables.
//!
//! - **[`engine`]: Run Settings.** Configuration, progress reporting and error types
//!   shared by the workflows.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures built on the two layers
//!   below, such as ranging a list of mass-to-charge values against a collection and
//!   reducing the hits to an ionic and elemental composition.

pub mod core;
pub mod engine;
pub mod workflows;
