#![cfg(feature = "sqlite")]

use chrono::{NaiveDate, NaiveDateTime};
use planboard::{
    BoardSnapshot, BoardStore, DurationUnit, Resource, ScheduledTask, SqliteBoardStore,
    UnplannedItem,
};

fn t(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn snapshot() -> BoardSnapshot {
    BoardSnapshot {
        resources: vec![Resource::new(1, "Volvo V90")],
        events: vec![ScheduledTask::new(
            20,
            "Oil change",
            t(9),
            1,
            DurationUnit::Hour,
            1,
        )],
        unplanned: vec![UnplannedItem::new(7, "Gym", 1, DurationUnit::Hour)],
    }
}

#[test]
fn fresh_store_holds_no_board() {
    let store = SqliteBoardStore::in_memory().unwrap();
    assert!(store.load_board().unwrap().is_none());
    assert!(store.revision().unwrap().is_none());
}

#[test]
fn board_round_trips_through_sqlite() {
    let store = SqliteBoardStore::in_memory().unwrap();
    store.save_board(&snapshot()).unwrap();

    let loaded = store.load_board().unwrap().expect("board stored");
    assert_eq!(loaded, snapshot());
}

#[test]
fn saving_an_empty_board_is_distinct_from_never_saving() {
    let store = SqliteBoardStore::in_memory().unwrap();
    store.save_board(&BoardSnapshot::default()).unwrap();

    let loaded = store.load_board().unwrap();
    assert_eq!(loaded, Some(BoardSnapshot::default()));
}

#[test]
fn revision_counts_saves() {
    let store = SqliteBoardStore::in_memory().unwrap();
    store.save_board(&snapshot()).unwrap();
    assert_eq!(store.revision().unwrap(), Some(1));

    let mut updated = snapshot();
    updated.events.clear();
    store.save_board(&updated).unwrap();
    assert_eq!(store.revision().unwrap(), Some(2));

    assert_eq!(store.load_board().unwrap(), Some(updated));
}

#[test]
fn file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("board.db");

    {
        let store = SqliteBoardStore::new(&path).unwrap();
        store.save_board(&snapshot()).unwrap();
    }

    let reopened = SqliteBoardStore::new(&path).unwrap();
    assert_eq!(reopened.load_board().unwrap(), Some(snapshot()));
}
