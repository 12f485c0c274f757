use super::load_collection;
use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use aprange::core::io::table::write_range_table;
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::info;

pub fn run(args: ExportArgs) -> Result<()> {
    let collection = load_collection(&args.input)?;

    match &args.output {
        Some(path) => {
            info!("Writing range table to {:?}", path);
            let writer = BufWriter::new(File::create(path)?);
            write_range_table(&collection, writer).map_err(|e| CliError::file_parsing(path, e))?;
            println!(
                "✓ Exported {} range(s) to: {}",
                collection.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            write_range_table(&collection, stdout.lock())
                .map_err(|e| CliError::Other(e.into()))?;
        }
    }
    Ok(())
}
