use super::load_collection;
use crate::cli::ConvertArgs;
use crate::error::{CliError, Result};
use aprange::core::models::collection::RangeCollection;
use tracing::info;

pub fn run(args: ConvertArgs) -> Result<()> {
    let collection = load_collection(&args.input)?;
    let collection = if args.sort {
        info!("Reordering ranges by lower bound.");
        sorted_copy(&collection)?
    } else {
        collection
    };

    info!("Writing range file to {:?}", &args.output);
    collection
        .write_rrng(&args.output)
        .map_err(|e| CliError::file_parsing(&args.output, e))?;
    println!(
        "✓ Wrote {} range(s) to: {}",
        collection.len(),
        args.output.display()
    );
    Ok(())
}

fn sorted_copy(collection: &RangeCollection) -> Result<RangeCollection> {
    let ranges = collection.sorted_ranges().into_iter().cloned().collect();
    RangeCollection::from_ranges(ranges).map_err(|e| CliError::Other(e.into()))
}
