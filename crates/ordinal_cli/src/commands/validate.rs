//! Validate command implementation.

use super::{print_json, resolve, CommandError, CommandResult, OutputFormat};
use ordinal_core::OrderEngine;
use serde_json::json;

/// Runs the validate command.
///
/// Fails (exit status 1) when any checked collection holds duplicate
/// positions. Nothing is repaired.
pub fn run(engine: &OrderEngine, collection: Option<&str>, format: OutputFormat) -> CommandResult {
    let mut duplicated = Vec::new();
    let mut report = Vec::new();

    for collection in resolve(collection)? {
        let stats = engine.order_stats(collection)?;
        if stats.has_duplicates() {
            duplicated.push(collection.to_string());
        }
        if format == OutputFormat::Text {
            if stats.has_duplicates() {
                println!("✗ {collection}: duplicate positions");
                for group in &stats.duplicates {
                    println!("    position {}: {}", group.position, group.ids.join(", "));
                }
            } else {
                println!("✓ {collection}: no duplicate positions");
            }
        }
        report.push(json!({
            "collection": collection,
            "valid": !stats.has_duplicates(),
            "duplicates": stats.duplicates,
        }));
    }

    if format == OutputFormat::Json {
        print_json(&report)?;
    }

    if duplicated.is_empty() {
        Ok(())
    } else {
        if format == OutputFormat::Text {
            println!();
            println!("Run `ordinal reorder` to repair");
        }
        Err(CommandError::DuplicatesFound(duplicated).into())
    }
}
