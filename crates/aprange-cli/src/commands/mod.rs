use crate::error::{CliError, Result};
use aprange::core::models::collection::RangeCollection;
use std::path::Path;
use tracing::info;

pub mod convert;
pub mod export;
pub mod info;
pub mod lookup;
pub mod quant;

pub(crate) fn load_collection(path: &Path) -> Result<RangeCollection> {
    info!("Loading range file from {:?}", path);
    RangeCollection::from_rrng(path).map_err(|e| CliError::file_parsing(path, e))
}
