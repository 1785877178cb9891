//! Init command implementation.

use super::{print_json, CommandResult, OutputFormat};
use ordinal_core::{Collection, OrderEngine};
use serde_json::json;

/// Runs the init command.
///
/// Tables are created when the engine is opened; this reports them.
pub fn run(engine: &OrderEngine, format: OutputFormat) -> CommandResult {
    match format {
        OutputFormat::Json => {
            let mut tables = Vec::with_capacity(Collection::ALL.len());
            for collection in Collection::ALL {
                let d = collection.descriptor();
                tables.push(json!({
                    "collection": d.name,
                    "table": d.table,
                    "idField": d.id_field,
                    "positionField": d.position_field,
                    "rows": engine.order_stats(collection)?.total,
                }));
            }
            print_json(&tables)?;
        }
        OutputFormat::Text => {
            println!("Collections:");
            for collection in Collection::ALL {
                let d = collection.descriptor();
                let stats = engine.order_stats(collection)?;
                println!(
                    "  {:<14} {}.{:<16} {} rows",
                    d.name, d.table, d.position_field, stats.total
                );
            }
            println!();
            println!("✓ Database ready");
        }
    }
    Ok(())
}
