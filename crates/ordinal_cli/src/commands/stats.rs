//! Stats command implementation.

use super::{print_json, resolve, CommandResult, OutputFormat};
use ordinal_core::{OrderEngine, OrderStats};
use std::collections::BTreeMap;

/// Runs the stats command.
pub fn run(engine: &OrderEngine, collection: Option<&str>, format: OutputFormat) -> CommandResult {
    let mut all = BTreeMap::new();
    for collection in resolve(collection)? {
        all.insert(collection.to_string(), engine.order_stats(collection)?);
    }

    match format {
        OutputFormat::Json => print_json(&all)?,
        OutputFormat::Text => {
            for (name, stats) in &all {
                print_stats(name, stats);
            }
        }
    }
    Ok(())
}

fn print_stats(name: &str, stats: &OrderStats) {
    println!("{name}:");
    println!("  Rows:          {}", stats.total);
    match (stats.min_position, stats.max_position) {
        (Some(min), Some(max)) => println!("  Positions:     {min}..={max}"),
        _ => println!("  Positions:     -"),
    }
    println!("  Dense:         {}", if stats.is_dense { "yes" } else { "no" });
    println!("  Gaps:          {}", stats.gap_count);
    if let Some(gap) = stats.first_gap {
        println!("  First gap:     {gap}");
    }
    println!("  Duplicates:    {}", stats.duplicates.len());
    println!("  Next position: {}", stats.next_position);
    println!();
}
