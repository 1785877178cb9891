//! Delete command implementation.

use super::{print_json, CommandError, CommandResult, OutputFormat};
use ordinal_core::{Collection, OrderEngine};
use serde_json::json;

/// Runs the delete command.
pub fn run(engine: &OrderEngine, collection: &str, id: &str, format: OutputFormat) -> CommandResult {
    let collection: Collection = collection.parse()?;
    if !engine.remove(collection, id)? {
        return Err(CommandError::RowNotFound {
            collection,
            id: id.to_string(),
        }
        .into());
    }

    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "deleted": true }))?,
        OutputFormat::Text => {
            println!("✓ Deleted {id}");
            println!("  Positions are not renumbered; run `ordinal compact {collection}` to close the gap");
        }
    }
    Ok(())
}
