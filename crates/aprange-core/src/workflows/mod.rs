//! # Workflows Module
//!
//! High-level procedures built on the [`core`](crate::core) models and the
//! [`engine`](crate::engine) settings.
//!
//! - **Ranging Workflow** ([`ranging`]) - Assigns mass-to-charge values to the ranges of a
//!   collection and reduces the hits to ionic and elemental compositions.

pub mod ranging;
