//! Next command implementation.

use super::{print_json, CommandResult, OutputFormat};
use ordinal_core::{Collection, OrderEngine};
use serde_json::json;

/// Runs the next command.
pub fn run(engine: &OrderEngine, collection: &str, format: OutputFormat) -> CommandResult {
    let collection: Collection = collection.parse()?;
    let next = engine.next_position(collection)?;
    match format {
        OutputFormat::Json => print_json(&json!({ "collection": collection, "next": next }))?,
        OutputFormat::Text => println!("{next}"),
    }
    Ok(())
}
