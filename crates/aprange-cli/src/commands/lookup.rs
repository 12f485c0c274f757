use super::load_collection;
use crate::cli::LookupArgs;
use crate::config::AppConfig;
use crate::error::Result;
use aprange::core::models::collection::RangeCollection;
use tracing::{debug, info};

pub fn run(args: LookupArgs, config: &AppConfig) -> Result<()> {
    let collection = load_collection(&args.input)?;
    info!("Looking up {} mass value(s).", args.masses.len());
    for mass in &args.masses {
        println!("{}", describe(&collection, *mass, config.output.precision));
    }
    Ok(())
}

pub(crate) fn describe(collection: &RangeCollection, mass: f64, precision: usize) -> String {
    match collection.find_by_mass(mass) {
        Ok(range) => format!(
            "{:.prec$}  {} [{:.prec$}, {:.prec$})",
            mass,
            range.hill_formula(),
            range.lower(),
            range.upper(),
            prec = precision
        ),
        Err(e) => {
            debug!("{}", e);
            format!("{:.prec$}  unranged", mass, prec = precision)
        }
    }
}
