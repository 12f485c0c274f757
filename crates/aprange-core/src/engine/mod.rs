//! # Engine Module
//!
//! Settings and plumbing shared by the workflows.
//!
//! - **Configuration** ([`config`]) - Validated run parameters built through builders
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - Errors raised while a workflow runs

pub mod config;
pub mod error;
pub mod progress;
