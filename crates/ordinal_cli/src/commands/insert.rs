//! Insert command implementation.

use super::{print_json, CommandError, CommandResult, OutputFormat};
use ordinal_core::{Collection, OrderEngine};
use ordinal_store::Row;
use serde_json::{json, Value};

/// Runs the insert command.
pub fn run(
    engine: &OrderEngine,
    collection: &str,
    attributes: Option<&str>,
    format: OutputFormat,
) -> CommandResult {
    let collection: Collection = collection.parse()?;
    let row = parse_attributes(attributes)?;
    let id = engine.append(collection, row)?;
    let position = engine
        .get_ordered_entities(collection)?
        .into_iter()
        .find(|e| e.id == id)
        .map(|e| e.position);

    match format {
        OutputFormat::Json => print_json(&json!({ "id": id, "position": position }))?,
        OutputFormat::Text => match position {
            Some(position) => println!("✓ Inserted {id} at position {position}"),
            None => println!("✓ Inserted {id}"),
        },
    }
    Ok(())
}

/// Parses `--attributes`; absent means an empty row.
pub fn parse_attributes(input: Option<&str>) -> CommandResult<Row> {
    let Some(input) = input else {
        return Ok(Row::new());
    };
    match serde_json::from_str::<Value>(input)? {
        Value::Object(row) => Ok(row),
        _ => Err(CommandError::AttributesNotObject.into()),
    }
}
