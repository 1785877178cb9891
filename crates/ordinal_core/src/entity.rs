//! Ordered entities and the canonical sort.

use crate::collection::Collection;
use crate::error::{CoreError, CoreResult};
use ordinal_store::{Row, Slot, CREATED_AT_COLUMN};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A row of an ordered collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedEntity {
    /// Store-assigned id.
    pub id: String,
    /// Current position.
    pub position: i64,
    /// Creation time in Unix milliseconds.
    pub created_at: i64,
    /// Business attributes, untouched by the engine.
    pub attributes: Row,
}

impl OrderedEntity {
    /// Splits a stored row into the ordering fields and the rest.
    pub fn from_row(collection: Collection, mut row: Row) -> CoreResult<Self> {
        let descriptor = collection.descriptor();
        let slot = Slot::from_row(
            descriptor.table,
            &row,
            descriptor.id_field,
            descriptor.position_field,
        )?;
        row.remove(descriptor.id_field);
        row.remove(descriptor.position_field);
        row.remove(CREATED_AT_COLUMN);
        Ok(Self {
            id: slot.id,
            position: slot.position,
            created_at: slot.created_at,
            attributes: row,
        })
    }
}

/// Sorts rows of `collection` in canonical order.
///
/// The result does not depend on the order the store returned the rows in.
pub(crate) fn sort_rows(collection: Collection, rows: Vec<Row>) -> CoreResult<Vec<(Slot, Row)>> {
    let descriptor = collection.descriptor();
    let mut keyed = rows
        .into_iter()
        .map(|row| {
            Slot::from_row(
                descriptor.table,
                &row,
                descriptor.id_field,
                descriptor.position_field,
            )
            .map(|slot| (slot, row))
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.canonical_cmp(b));
    Ok(keyed)
}

/// Decodes a full row, ordering columns included, into `T`.
pub(crate) fn decode_row<T: DeserializeOwned>(collection: Collection, row: Row) -> CoreResult<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| CoreError::decode(collection.name(), &e))
}
