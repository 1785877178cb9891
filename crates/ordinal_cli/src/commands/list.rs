//! List command implementation.

use super::{print_json, CommandResult, OutputFormat};
use ordinal_core::{Collection, OrderEngine, OrderedEntity};

/// Runs the list command.
pub fn run(engine: &OrderEngine, collection: &str, format: OutputFormat) -> CommandResult {
    let collection: Collection = collection.parse()?;
    let entities = engine.get_ordered_entities(collection)?;

    match format {
        OutputFormat::Json => print_json(&entities)?,
        OutputFormat::Text => {
            if entities.is_empty() {
                println!("{collection} is empty");
                return Ok(());
            }
            for entity in &entities {
                println!("{}", format_line(entity));
            }
        }
    }
    Ok(())
}

fn format_line(entity: &OrderedEntity) -> String {
    if entity.attributes.is_empty() {
        format!("{:>6}  {}", entity.position, entity.id)
    } else {
        let attributes = serde_json::Value::Object(entity.attributes.clone());
        format!("{:>6}  {}  {}", entity.position, entity.id, attributes)
    }
}
