use super::load_collection;
use crate::cli::InfoArgs;
use crate::config::AppConfig;
use crate::error::Result;
use aprange::core::models::collection::RangeCollection;
use aprange::core::models::range::Range;
use std::fmt::Write;
use tracing::info;

pub fn run(args: InfoArgs, config: &AppConfig) -> Result<()> {
    let collection = load_collection(&args.input)?;
    let sorted = args.order.resolve(config.output.sorted);
    info!("Summarizing {} range(s).", collection.len());
    print!("{}", render(&collection, config.output.precision, sorted));
    Ok(())
}

pub(crate) fn render(collection: &RangeCollection, precision: usize, sorted: bool) -> String {
    let ions: Vec<String> = collection.ions().iter().map(|i| i.hill_formula()).collect();
    let elements = collection.elements();
    let symbols: Vec<&str> = elements.iter().map(|e| e.symbol()).collect();

    let mut out = String::new();
    if let Some(path) = collection.filepath() {
        let _ = writeln!(out, "File:     {}", path.display());
    }
    let _ = writeln!(out, "Ranges:   {}", collection.len());
    let _ = writeln!(out, "Ions:     {} ({})", ions.len(), ions.join(", "));
    let _ = writeln!(out, "Elements: {} ({})", symbols.len(), symbols.join(", "));

    if collection.is_empty() {
        return out;
    }

    let rows: Vec<&Range> = if sorted {
        collection.sorted_ranges()
    } else {
        collection.iter().collect()
    };
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>4}  {:<10} {:>12} {:>12} {:>10}  Color",
        "#", "Ion", "Lower", "Upper", "Volume"
    );
    for (i, range) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<10} {:>12.prec$} {:>12.prec$} {:>10}  {}",
            i + 1,
            range.hill_formula(),
            range.lower(),
            range.upper(),
            range.volume(),
            range.color(),
            prec = precision
        );
    }
    out
}
