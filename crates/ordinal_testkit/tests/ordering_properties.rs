//! Property tests for the ordering engine, run against both backends.

use ordinal_core::{Collection, CoreError, OrderEngine};
use ordinal_store::{InMemoryStore, PositionStore, Row, CREATED_AT_COLUMN};
use ordinal_testkit::prelude::*;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

const COLLECTION: Collection = Collection::Excursions;

fn no_duplicates(pairs: &[(String, i64)]) -> bool {
    let mut seen = HashSet::new();
    pairs.iter().all(|(_, p)| seen.insert(*p))
}

/// Inserts rows with fixed `(id, position, created_at)` triples.
fn insert_fixed(engine: &OrderEngine, rows: &[(String, i64, i64)]) {
    let d = COLLECTION.descriptor();
    for (id, position, created_at) in rows {
        let mut row = Row::new();
        row.insert(d.id_field.into(), json!(id));
        row.insert(d.position_field.into(), json!(position));
        row.insert(CREATED_AT_COLUMN.into(), json!(created_at));
        engine.store().insert(d.table, d.id_field, row).unwrap();
    }
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn moves_never_create_duplicates(
        size in collection_size_strategy(12),
        steps in move_sequence_strategy(1, 30),
    ) {
        for backend in Backend::ALL {
            let engine = TestEngine::on(backend);
            let ids = scenarios::seed(&engine, COLLECTION, size);
            for step in &steps {
                let outcome = engine.move_to(COLLECTION, step.id(&ids), step.target);
                prop_assert!(outcome.is_ok(), "{:?}: {:?}", backend, outcome);
                let after = positions(&engine, COLLECTION);
                prop_assert!(no_duplicates(&after), "{:?}: {:?}", backend, after);
                prop_assert_eq!(
                    position_of(&engine, COLLECTION, step.id(&ids)),
                    Some(step.target)
                );
                prop_assert_eq!(after.len(), size);
            }
        }
    }

    #[test]
    fn backends_agree(
        size in collection_size_strategy(10),
        steps in move_sequence_strategy(1, 20),
    ) {
        let memory = TestEngine::memory();
        let sqlite = TestEngine::sqlite();
        let ids: Vec<String> = (0..size).map(|i| format!("row{i:02}")).collect();
        let rows: Vec<(String, i64, i64)> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as i64 + 1, 1_000 + i as i64))
            .collect();
        insert_fixed(&memory, &rows);
        insert_fixed(&sqlite, &rows);

        for step in &steps {
            let a = memory.move_to(COLLECTION, step.id(&ids), step.target).unwrap();
            let b = sqlite.move_to(COLLECTION, step.id(&ids), step.target).unwrap();
            prop_assert_eq!(a, b);
        }
        prop_assert_eq!(positions(&memory, COLLECTION), positions(&sqlite, COLLECTION));
    }

    #[test]
    fn compaction_is_idempotent(scattered in scattered_positions_strategy(20)) {
        for backend in Backend::ALL {
            let engine = TestEngine::on(backend);
            let rows: Vec<(String, i64, i64)> = scattered
                .iter()
                .enumerate()
                .map(|(i, p)| (format!("r{i}"), *p, i as i64))
                .collect();
            insert_fixed(&engine, &rows);

            engine.compact(COLLECTION).unwrap();
            let once = positions(&engine, COLLECTION);
            let dense: Vec<i64> = (1..=scattered.len() as i64).collect();
            let got: Vec<i64> = once.iter().map(|(_, p)| *p).collect();
            prop_assert_eq!(got, dense);

            prop_assert_eq!(engine.compact(COLLECTION).unwrap(), 0);
            prop_assert_eq!(positions(&engine, COLLECTION), once);
        }
    }

    #[test]
    fn compaction_preserves_relative_order(scattered in scattered_positions_strategy(20)) {
        let engine = TestEngine::memory();
        let rows: Vec<(String, i64, i64)> = scattered
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("r{i}"), *p, i as i64))
            .collect();
        insert_fixed(&engine, &rows);

        let before: Vec<String> = positions(&engine, COLLECTION).into_iter().map(|(id, _)| id).collect();
        engine.compact(COLLECTION).unwrap();
        let after: Vec<String> = positions(&engine, COLLECTION).into_iter().map(|(id, _)| id).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn ordered_items_ignore_scan_order(
        scattered in scattered_positions_strategy(16),
        stamps in prop::collection::vec(0i64..5, 16),
        shuffle in any::<prop::sample::Index>(),
    ) {
        let rows: Vec<(String, i64, i64)> = scattered
            .iter()
            .enumerate()
            .map(|(i, p)| (format!("r{i:02}"), *p, stamps[i]))
            .collect();
        let mut rotated = rows.clone();
        if !rotated.is_empty() {
            let by = shuffle.index(rotated.len());
            rotated.rotate_left(by);
        }
        rotated.reverse();

        let a = TestEngine::memory();
        let b = TestEngine::sqlite();
        insert_fixed(&a, &rows);
        insert_fixed(&b, &rotated);
        prop_assert_eq!(positions(&a, COLLECTION), positions(&b, COLLECTION));
    }

    #[test]
    fn moving_to_current_position_is_a_no_op(
        size in collection_size_strategy(10),
        pick in any::<prop::sample::Index>(),
    ) {
        for backend in Backend::ALL {
            let engine = TestEngine::on(backend);
            let ids = scenarios::seed(&engine, COLLECTION, size);
            let id = pick.get(&ids);
            let before = positions(&engine, COLLECTION);
            let current = position_of(&engine, COLLECTION, id).unwrap();

            let outcome = engine.move_to(COLLECTION, id, current).unwrap();
            prop_assert!(outcome.is_no_op());
            prop_assert_eq!(positions(&engine, COLLECTION), before);
        }
    }

    #[test]
    fn invalid_targets_are_rejected_without_writes(
        target in invalid_position_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = Arc::new(InMemoryStore::new());
        let engine = OrderEngine::new(store.clone());
        engine.prepare().unwrap();
        let ids = scenarios::seed(&engine, COLLECTION, 4);
        let before = store.snapshot("excursions");

        let err = engine.move_to(COLLECTION, pick.get::<String>(&ids), target).unwrap_err();
        prop_assert!(
            matches!(err, CoreError::InvalidPosition { position } if position == target),
            "unexpected error {:?}",
            err
        );
        prop_assert_eq!(store.snapshot("excursions"), before);
    }

    #[test]
    fn reorder_repairs_any_state(scattered in scattered_positions_strategy(20)) {
        for backend in Backend::ALL {
            let engine = TestEngine::on(backend);
            let rows: Vec<(String, i64, i64)> = scattered
                .iter()
                .enumerate()
                .map(|(i, p)| (format!("r{i}"), *p, i as i64))
                .collect();
            insert_fixed(&engine, &rows);

            engine.reorder(COLLECTION).unwrap();
            prop_assert!(engine.validate_no_duplicates(COLLECTION).unwrap());
            prop_assert!(engine.order_stats(COLLECTION).unwrap().is_dense);
        }
    }
}
