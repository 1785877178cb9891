//! Compact and reorder command implementations.

use super::{print_json, resolve, CommandError, CommandResult, OutputFormat};
use ordinal_core::OrderEngine;
use serde_json::json;

/// Which renumbering to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Close gaps left by deletions.
    Compact,
    /// Repair duplicate positions.
    Reorder,
}

/// Runs the compact or reorder command over one or all collections.
pub fn run(
    engine: &OrderEngine,
    collection: Option<&str>,
    mode: Mode,
    format: OutputFormat,
) -> CommandResult {
    let mut reports = Vec::new();
    let mut failed = Vec::new();

    for collection in resolve(collection)? {
        let client = engine.client(collection);
        let result = match mode {
            Mode::Compact => client.compact_positions(),
            Mode::Reorder => client.reorder_table(),
        };
        if format == OutputFormat::Text {
            let mark = if result.success { '✓' } else { '✗' };
            println!("{mark} {collection}: {}", result.message);
        }
        if !result.success {
            failed.push(format!("{collection}: {}", result.message));
        }
        reports.push((collection, result));
    }

    if format == OutputFormat::Json {
        let body: Vec<_> = reports
            .iter()
            .map(|(collection, result)| json!({ "collection": collection, "result": result }))
            .collect();
        print_json(&body)?;
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(CommandError::Rejected(failed.join("; ")).into())
    }
}
