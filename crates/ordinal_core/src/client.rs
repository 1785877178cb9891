//! Per-collection facade.

use crate::collection::Collection;
use crate::engine::OrderEngine;
use crate::error::CoreResult;
use crate::position::Position;
use crate::report::{BatchOutcome, MoveRequest, OrderResult};
use crate::stats::OrderStats;
use serde::de::DeserializeOwned;

/// An [`OrderEngine`] bound to one collection.
///
/// Write operations return an [`OrderResult`] whose message can be shown
/// as is. After a successful swap, re-read the list: a move can relocate a
/// second row.
#[derive(Debug, Clone, Copy)]
pub struct CollectionClient<'e> {
    engine: &'e OrderEngine,
    collection: Collection,
}

impl<'e> CollectionClient<'e> {
    /// Binds `engine` to `collection`.
    pub fn new(engine: &'e OrderEngine, collection: Collection) -> Self {
        Self { engine, collection }
    }

    /// The bound collection.
    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Rows in display order, decoded as `T`.
    pub fn get_ordered_items<T: DeserializeOwned>(&self) -> CoreResult<Vec<T>> {
        self.engine.get_ordered_items(self.collection)
    }

    /// Position to give the next inserted row.
    pub fn get_next_position(&self) -> CoreResult<i64> {
        self.engine.next_position(self.collection)
    }

    /// Moves `id` to `new_position`.
    pub fn swap_position(&self, id: &str, new_position: i64) -> OrderResult {
        OrderResult::from_move(&self.engine.move_to(self.collection, id, new_position))
    }

    /// Moves `id` to a position typed by a user, such as a numeric field.
    pub fn swap_position_input(&self, id: &str, input: &str) -> OrderResult {
        let result = input
            .parse::<Position>()
            .and_then(|target| self.engine.move_to_position(self.collection, id, target));
        OrderResult::from_move(&result)
    }

    /// Applies a drag-and-drop sequence in order.
    pub fn batch_move(&self, moves: &[MoveRequest]) -> CoreResult<BatchOutcome> {
        self.engine.batch_move(self.collection, moves)
    }

    /// Closes gaps.
    pub fn compact_positions(&self) -> OrderResult {
        OrderResult::from_renumber(&self.engine.compact(self.collection))
    }

    /// Repairs duplicate positions.
    pub fn reorder_table(&self) -> OrderResult {
        OrderResult::from_renumber(&self.engine.reorder(self.collection))
    }

    /// False if two rows share a position.
    pub fn validate_no_duplicates(&self) -> CoreResult<bool> {
        self.engine.validate_no_duplicates(self.collection)
    }

    /// Shape of the ordering.
    pub fn get_order_stats(&self) -> CoreResult<OrderStats> {
        self.engine.order_stats(self.collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordinal_store::{InMemoryStore, Row};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Deserialize)]
    struct Excursion {
        id: String,
        position: i64,
        title: String,
    }

    fn seeded() -> OrderEngine {
        let engine = OrderEngine::new(Arc::new(InMemoryStore::new()));
        engine.prepare().unwrap();
        for title in ["A", "B", "C"] {
            let mut row = Row::new();
            row.insert("title".into(), json!(title));
            engine.append(Collection::Excursions, row).unwrap();
        }
        engine
    }

    fn titles(client: &CollectionClient<'_>) -> Vec<(String, i64)> {
        client
            .get_ordered_items::<Excursion>()
            .unwrap()
            .into_iter()
            .map(|e| (e.title, e.position))
            .collect()
    }

    #[test]
    fn swap_reports_displaced_row() {
        let engine = seeded();
        let client = engine.client(Collection::Excursions);
        let items = client.get_ordered_items::<Excursion>().unwrap();
        let c = &items[2].id;

        let result = client.swap_position(c, 1);
        assert!(result.success, "{}", result.message);
        assert_eq!(result.new_position, Some(3));
        assert_eq!(
            titles(&client),
            vec![("C".to_string(), 1), ("B".to_string(), 2), ("A".to_string(), 3)]
        );
    }

    #[test]
    fn swap_failures_are_values() {
        let engine = seeded();
        let client = engine.client(Collection::Excursions);

        let invalid = client.swap_position("whatever", 0);
        assert!(!invalid.success);
        assert!(invalid.message.contains("positions start at 1"));

        let missing = client.swap_position("ghost", 1);
        assert!(!missing.success);
    }

    #[test]
    fn typed_input_is_validated() {
        let engine = seeded();
        let client = engine.client(Collection::Excursions);
        let first = client.get_ordered_items::<Excursion>().unwrap()[0].id.clone();

        let result = client.swap_position_input(&first, "two");
        assert!(!result.success);
        assert!(result.message.contains("not a whole number"));

        let result = client.swap_position_input(&first, " 2 ");
        assert!(result.success);
    }

    #[test]
    fn maintenance_operations() {
        let engine = seeded();
        let client = engine.client(Collection::Excursions);
        let first = client.get_ordered_items::<Excursion>().unwrap()[0].id.clone();
        assert!(client.swap_position(&first, 10).success);
        assert!(!client.get_order_stats().unwrap().is_dense);

        let compacted = client.compact_positions();
        assert!(compacted.success);
        assert_eq!(compacted.message, "renumbered 3 rows");
        assert!(client.get_order_stats().unwrap().is_dense);
        assert_eq!(client.reorder_table().message, "positions already contiguous");
        assert!(client.validate_no_duplicates().unwrap());
        assert_eq!(client.get_next_position().unwrap(), 4);
    }

    #[test]
    fn clients_are_independent() {
        let engine = seeded();
        assert_eq!(engine.client(Collection::Places).get_next_position().unwrap(), 1);
        assert_eq!(engine.client(Collection::Excursions).get_next_position().unwrap(), 4);
    }
}
