//! Concrete ordering scenarios on every backend.

use ordinal_core::{Collection, CoreError, EngineConfig, MoveRequest, OrderEngine};
use ordinal_store::{InMemoryStore, SqliteStore, StoreError};
use ordinal_testkit::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

#[test]
fn excursion_moved_to_front() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(engine, Collection::Excursions, &[("A", 1), ("B", 2), ("C", 3)]);

        let result = engine.client(Collection::Excursions).swap_position("C", 1);
        assert!(result.success, "{backend:?}: {}", result.message);
        assert_eq!(
            positions(engine, Collection::Excursions),
            expected(&[("C", 1), ("B", 2), ("A", 3)]),
            "{backend:?}"
        );
    });
}

#[test]
fn single_collision_touches_two_rows() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(engine, Collection::Places, &[("x", 1), ("y", 2), ("z", 3)]);

        let outcome = engine.move_to(Collection::Places, "x", 2).unwrap();
        assert_eq!(outcome.displaced.len(), 1, "{backend:?}");
        assert_eq!(
            positions(engine, Collection::Places),
            expected(&[("x", 2), ("z", 3), ("y", 4)]),
            "{backend:?}"
        );
    });
}

#[test]
fn displaced_row_skips_occupied_slots() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(
            engine,
            Collection::Restaurants,
            &[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)],
        );

        let outcome = engine.move_to(Collection::Restaurants, "d", 2).unwrap();
        assert_eq!(outcome.displaced[0].id, "b");
        assert_eq!(outcome.displaced[0].to, 4, "{backend:?}");
        assert!(engine.validate_no_duplicates(Collection::Restaurants).unwrap());
    });
}

#[test]
fn out_of_range_target_then_compact() {
    on_each_backend(|backend, engine| {
        let ids = scenarios::seed(engine, Collection::Supermarkets, 5);

        engine.move_to(Collection::Supermarkets, &ids[1], 9999).unwrap();
        assert_eq!(position_of(engine, Collection::Supermarkets, &ids[1]), Some(9999));
        assert!(engine.validate_no_duplicates(Collection::Supermarkets).unwrap());

        engine.compact(Collection::Supermarkets).unwrap();
        let after = positions(engine, Collection::Supermarkets);
        let got: Vec<i64> = after.iter().map(|(_, p)| *p).collect();
        assert_eq!(got, [1, 2, 3, 4, 5], "{backend:?}");
        assert_eq!(after[4].0, ids[1], "{backend:?}");
    });
}

#[test]
fn pre_existing_duplicates_are_all_displaced() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(
            engine,
            Collection::Services,
            &[("old", 2), ("new", 2), ("m", 1), ("z", 3)],
        );

        let outcome = engine.move_to(Collection::Services, "m", 2).unwrap();
        let moved: Vec<_> = outcome.displaced.iter().map(|d| (d.id.as_str(), d.to)).collect();
        assert_eq!(moved, [("old", 4), ("new", 5)], "{backend:?}");
        assert!(engine.validate_no_duplicates(Collection::Services).unwrap());
    });
}

#[test]
fn batch_stops_after_store_failure() {
    let store = FaultyStore::new(InMemoryStore::new()).fail_swap_at(2);
    let store = Arc::new(store);
    let engine = OrderEngine::new(store.clone());
    engine.prepare().unwrap();
    scenarios::seed_exact(&engine, Collection::Places, &[("a", 1), ("b", 2), ("c", 3)]);

    let moves = [
        MoveRequest::new("c", 1),
        MoveRequest::new("a", 2),
        MoveRequest::new("b", 1),
    ];
    let err = engine.batch_move(Collection::Places, &moves).unwrap_err();

    assert_eq!(err.applied_moves(), 1);
    assert!(err.is_transient());
    match err {
        CoreError::BatchInterrupted {
            failed_index,
            source,
            ..
        } => {
            assert_eq!(failed_index, 1);
            assert!(matches!(*source, CoreError::Store(StoreError::Unavailable(_))));
        }
        other => panic!("unexpected error {other:?}"),
    }
    // the third move never reached the store
    assert_eq!(store.swaps(), 2);
    assert_eq!(
        positions(&engine, Collection::Places),
        expected(&[("c", 1), ("b", 2), ("a", 3)])
    );
}

#[test]
fn batch_rejects_invalid_position_mid_way() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(engine, Collection::Places, &[("a", 1), ("b", 2)]);
        let moves = [MoveRequest::new("b", 1), MoveRequest::new("a", 0)];

        let err = engine.batch_move(Collection::Places, &moves).unwrap_err();
        assert_eq!(err.applied_moves(), 1, "{backend:?}");
        assert_eq!(position_of(engine, Collection::Places, "b"), Some(1));
    });
}

#[test]
fn oversized_batch_applies_nothing() {
    let engine = OrderEngine::with_config(
        Arc::new(InMemoryStore::new()),
        EngineConfig::new().max_batch_moves(2),
    );
    engine.prepare().unwrap();
    scenarios::seed_exact(&engine, Collection::Places, &[("a", 1), ("b", 2), ("c", 3)]);
    let moves = [
        MoveRequest::new("c", 1),
        MoveRequest::new("b", 1),
        MoveRequest::new("a", 1),
    ];
    assert!(matches!(
        engine.batch_move(Collection::Places, &moves),
        Err(CoreError::BatchTooLarge { len: 3, max: 2 })
    ));
    assert_eq!(
        positions(&engine, Collection::Places),
        expected(&[("a", 1), ("b", 2), ("c", 3)])
    );
}

#[test]
fn deletion_leaves_gap_until_compaction() {
    on_each_backend(|backend, engine| {
        let ids = scenarios::seed(engine, Collection::Destinations, 4);
        assert!(engine.remove(Collection::Destinations, &ids[1]).unwrap());

        let stats = engine.order_stats(Collection::Destinations).unwrap();
        assert_eq!(stats.first_gap, Some(2), "{backend:?}");
        assert_eq!(engine.next_position(Collection::Destinations).unwrap(), 4);

        assert_eq!(engine.compact(Collection::Destinations).unwrap(), 2);
        assert!(engine.order_stats(Collection::Destinations).unwrap().is_dense);
    });
}

#[test]
fn manual_duplicates_are_detected_and_repaired() {
    on_each_backend(|backend, engine| {
        scenarios::seed_exact(engine, Collection::Places, &[("a", 1), ("b", 2), ("c", 2)]);
        let client = engine.client(Collection::Places);

        assert!(!client.validate_no_duplicates().unwrap(), "{backend:?}");
        let stats = client.get_order_stats().unwrap();
        assert_eq!(stats.duplicates.len(), 1);
        assert_eq!(stats.duplicates[0].ids, ["b", "c"]);

        assert!(client.reorder_table().success);
        assert!(client.validate_no_duplicates().unwrap());
        assert_eq!(
            positions(engine, Collection::Places),
            expected(&[("a", 1), ("b", 2), ("c", 3)])
        );
    });
}

#[test]
fn typed_reads_through_client() {
    #[derive(Debug, Deserialize)]
    struct Service {
        id: String,
        display_order: i64,
        label: String,
    }

    on_each_backend(|backend, engine| {
        let ids = scenarios::seed(engine, Collection::Services, 3);
        engine.move_to(Collection::Services, &ids[2], 1).unwrap();

        let services: Vec<Service> = engine
            .client(Collection::Services)
            .get_ordered_items()
            .unwrap();
        assert_eq!(services[0].id, ids[2], "{backend:?}");
        assert_eq!(services[0].label, "row 2");
        let order: Vec<i64> = services.iter().map(|s| s.display_order).collect();
        assert_eq!(order, [1, 2, 3]);
    });
}

#[test]
fn sqlite_order_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("catalog.db");
    let ids = {
        let engine = OrderEngine::new(Arc::new(SqliteStore::open(&path).unwrap()));
        engine.prepare().unwrap();
        let ids = scenarios::seed(&engine, Collection::Excursions, 3);
        engine.move_to(Collection::Excursions, &ids[2], 1).unwrap();
        ids
    };

    let engine = OrderEngine::new(Arc::new(SqliteStore::open(&path).unwrap()));
    engine.prepare().unwrap();
    let order: Vec<String> = positions(&engine, Collection::Excursions)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(order, [ids[2].clone(), ids[1].clone(), ids[0].clone()]);

    let appended = engine
        .append(Collection::Excursions, ordinal_store::Row::new())
        .unwrap();
    assert_eq!(positions(&engine, Collection::Excursions)[3].0, appended);
}

#[test]
fn store_outage_is_reported_not_retried() {
    let store = Arc::new(FaultyStore::new(InMemoryStore::new()));
    let engine = OrderEngine::new(store.clone());
    engine.prepare().unwrap();
    scenarios::seed_exact(&engine, Collection::Places, &[("a", 1), ("b", 2)]);

    store.set_fail_all(true);
    let result = engine.client(Collection::Places).swap_position("b", 1);
    assert!(!result.success);
    assert!(result.message.contains("injected fault"));
    assert_eq!(store.swaps(), 1);
    assert_eq!(engine.stats().store_failures(), 1);

    store.set_fail_all(false);
    assert_eq!(
        positions(&engine, Collection::Places),
        expected(&[("a", 1), ("b", 2)])
    );
}
