//! Move and batch command implementations.

use super::{print_json, CommandError, CommandResult, OutputFormat};
use ordinal_core::{Collection, MoveRequest, OrderEngine, OrderResult};
use std::path::Path;

/// Runs the move command.
///
/// `position` is taken as typed so that non-numeric input is reported the
/// same way the engine reports any other rejected move.
pub fn run_move(
    engine: &OrderEngine,
    collection: &str,
    id: &str,
    position: &str,
    format: OutputFormat,
) -> CommandResult {
    let collection: Collection = collection.parse()?;
    let result = engine.client(collection).swap_position_input(id, position);
    report(&result, format)
}

/// Runs the batch command.
pub fn run_batch(
    engine: &OrderEngine,
    collection: &str,
    file: &Path,
    format: OutputFormat,
) -> CommandResult {
    let collection: Collection = collection.parse()?;
    let moves = read_moves(file)?;
    if format == OutputFormat::Text {
        println!("Applying {} moves to {collection}", moves.len());
    }
    let result = engine.batch_move(collection, &moves);
    if let (OutputFormat::Text, Ok(batch)) = (format, &result) {
        for outcome in &batch.outcomes {
            println!("{}", OrderResult::from_move(&Ok(outcome.clone())).message);
        }
    }
    report(&OrderResult::from_batch(&result), format)
}

/// Reads a JSON array of moves.
pub fn read_moves(file: &Path) -> CommandResult<Vec<MoveRequest>> {
    let text = std::fs::read_to_string(file)?;
    Ok(serde_json::from_str(&text)?)
}

fn report(result: &OrderResult, format: OutputFormat) -> CommandResult {
    match format {
        OutputFormat::Json => print_json(result)?,
        OutputFormat::Text if result.success => println!("✓ {}", result.message),
        OutputFormat::Text => println!("✗ {}", result.message),
    }
    if result.success {
        Ok(())
    } else {
        Err(CommandError::Rejected(result.message.clone()).into())
    }
}
