use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use planboard::{
    BoardSnapshot, CrudError, CrudTransport, DropOutcome, DurationUnit, LoadParams,
    MemoryNotifier, Orientation, PlanBoard, Point, Resource, ScheduledTask, Severity,
    SurfaceConfig, SyncRequest, UnplannedItem,
};
use std::sync::{Arc, Mutex};

fn t(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn seed() -> BoardSnapshot {
    BoardSnapshot {
        resources: vec![
            Resource::new(1, "Volvo V90"),
            Resource::new(2, "BMW M3"),
            Resource::new(3, "Peugeot 308"),
        ],
        events: vec![ScheduledTask::new(
            20,
            "Oil change",
            t(9),
            2,
            DurationUnit::Hour,
            1,
        )],
        unplanned: vec![
            UnplannedItem::new(7, "Gym", 1, DurationUnit::Hour),
            UnplannedItem::new(9, "Book flight", 7, DurationUnit::Hour),
        ],
    }
}

struct StaticTransport {
    snapshot: BoardSnapshot,
}

#[async_trait]
impl CrudTransport for StaticTransport {
    async fn load(&self, _params: &LoadParams) -> Result<BoardSnapshot, CrudError> {
        Ok(self.snapshot.clone())
    }

    async fn sync(&self, _request: &SyncRequest) -> Result<(), CrudError> {
        Ok(())
    }
}

struct FailingTransport;

#[async_trait]
impl CrudTransport for FailingTransport {
    async fn load(&self, _params: &LoadParams) -> Result<BoardSnapshot, CrudError> {
        Err(CrudError::LoadFailure {
            message: Some("no such table".into()),
        })
    }

    async fn sync(&self, _request: &SyncRequest) -> Result<(), CrudError> {
        Err(CrudError::SyncFailure { message: None })
    }
}

struct BrokenSyncTransport {
    snapshot: BoardSnapshot,
}

#[async_trait]
impl CrudTransport for BrokenSyncTransport {
    async fn load(&self, _params: &LoadParams) -> Result<BoardSnapshot, CrudError> {
        Ok(self.snapshot.clone())
    }

    async fn sync(&self, _request: &SyncRequest) -> Result<(), CrudError> {
        Err(CrudError::SyncFailure { message: None })
    }
}

struct RecordingTransport {
    snapshot: BoardSnapshot,
    synced: Arc<Mutex<Vec<SyncRequest>>>,
}

#[async_trait]
impl CrudTransport for RecordingTransport {
    async fn load(&self, _params: &LoadParams) -> Result<BoardSnapshot, CrudError> {
        Ok(self.snapshot.clone())
    }

    async fn sync(&self, request: &SyncRequest) -> Result<(), CrudError> {
        self.synced.lock().unwrap().push(request.clone());
        Ok(())
    }
}

fn board_with(transport: Box<dyn CrudTransport>) -> (PlanBoard, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let board = PlanBoard::new(
        SurfaceConfig::default(),
        transport,
        Box::new(notifier.clone()),
    );
    (board, notifier)
}

// SurfaceConfig::default runs 08:00-18:00 at 64 px/h with 50 px lanes, so
// x = 64 is 09:00 and y = 10 is the first resource lane.

#[tokio::test]
async fn reload_populates_the_board_and_notifies() {
    let (mut board, notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));

    board.reload().await.unwrap();

    assert_eq!(board.resources().len(), 3);
    assert_eq!(board.store().scheduled().len(), 1);
    assert_eq!(board.store().unplanned().len(), 2);
    assert!(notifier.messages().contains(&"Data reloaded".to_string()));
}

#[tokio::test]
async fn reload_failure_is_reported_not_fatal() {
    let (mut board, notifier) = board_with(Box::new(FailingTransport));

    let err = board.reload().await.unwrap_err();
    assert_eq!(err.action(), "load");

    let entries = notifier.take();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].message,
        "Action \"load\" failed. Server response: no such table"
    );
    assert_eq!(entries[0].severity, Severity::Error);
    assert_eq!(entries[0].timeout_ms, 3000);
}

#[tokio::test]
async fn reset_reports_database_was_reset() {
    let (mut board, notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));

    board.reset().await.unwrap();

    assert!(notifier.messages().contains(&"Database was reset".to_string()));
}

#[tokio::test]
async fn gym_drop_commits_and_reports_the_covered_task() {
    let (mut board, notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));
    board.reload().await.unwrap();

    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    let context = board.move_drag(Point::new(64.0, 10.0)).unwrap();
    assert!(context.valid);

    let DropOutcome::Committed { task, covered } = board.release_drag() else {
        panic!("expected a committed drop");
    };
    assert_eq!(task.name, "Gym");
    assert_eq!(task.start_date, t(9));
    assert_eq!(task.resource_id, 1);
    assert_eq!(covered, Some(20));
    assert!(!board.store().contains_unplanned(7));
    assert!(
        notifier
            .messages()
            .contains(&"Dropped \"Gym\" on top of \"Oil change\"".to_string())
    );
}

#[tokio::test]
async fn duplicate_drop_is_swallowed_silently() {
    let mut snapshot = seed();
    snapshot.events.push(ScheduledTask::new(
        30,
        "Book flight",
        t(13),
        7,
        DurationUnit::Hour,
        3,
    ));
    let (mut board, notifier) = board_with(Box::new(StaticTransport { snapshot }));
    board.reload().await.unwrap();
    let scheduled_before = board.store().scheduled().len();
    let toasts_before = notifier.messages().len();

    board.begin_drag(9, Point::new(0.0, 0.0), 0.0).unwrap();
    board.move_drag(Point::new(64.0, 60.0)).unwrap();

    let outcome = board.release_drag();
    assert_eq!(
        outcome,
        DropOutcome::DuplicateSuppressed {
            name: "Book flight".into()
        }
    );
    assert_eq!(board.store().scheduled().len(), scheduled_before);
    // Suppression is silent; no toast is raised.
    assert_eq!(notifier.messages().len(), toasts_before);
    // The pool removal still happened.
    assert!(!board.store().contains_unplanned(9));
}

#[tokio::test]
async fn reload_mid_gesture_discards_the_context() {
    let (mut board, _notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));
    board.reload().await.unwrap();

    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    let context = board.move_drag(Point::new(64.0, 10.0)).unwrap();
    assert!(context.valid);

    board.reload().await.unwrap();

    assert!(!board.is_dragging());
    // Releasing the discarded gesture is a no-op.
    assert_eq!(board.release_drag(), DropOutcome::Aborted);
    assert!(board.store().contains_unplanned(7));
    assert_eq!(board.store().scheduled().len(), 1);
}

#[tokio::test]
async fn sync_pushes_committed_transfers() {
    let synced = Arc::new(Mutex::new(Vec::new()));
    let transport = RecordingTransport {
        snapshot: seed(),
        synced: synced.clone(),
    };
    let (mut board, _notifier) = board_with(Box::new(transport));
    board.reload().await.unwrap();

    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    board.move_drag(Point::new(448.0, 10.0)).unwrap();
    assert!(matches!(
        board.release_drag(),
        DropOutcome::Committed { .. }
    ));

    board.sync().await.unwrap();

    let recorded = synced.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].added.len(), 1);
    assert_eq!(recorded[0].added[0].name, "Gym");
    drop(recorded);

    assert!(!board.store().has_pending_changes());

    // Nothing pending: the next sync never reaches the transport.
    board.sync().await.unwrap();
    assert_eq!(synced.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sync_failure_requeues_changes_for_manual_retry() {
    let (mut board, notifier) = board_with(Box::new(BrokenSyncTransport { snapshot: seed() }));
    board.reload().await.unwrap();

    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    board.move_drag(Point::new(448.0, 10.0)).unwrap();
    assert!(matches!(
        board.release_drag(),
        DropOutcome::Committed { .. }
    ));

    board.sync().await.unwrap_err();

    assert!(board.store().has_pending_changes());
    assert!(
        notifier
            .messages()
            .contains(&"Action \"sync\" failed.".to_string())
    );
}

#[tokio::test]
async fn sync_never_touches_a_gesture_in_flight() {
    let (mut board, _notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));
    board.reload().await.unwrap();

    // Commit one transfer so the sync has something to push.
    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    board.move_drag(Point::new(448.0, 10.0)).unwrap();
    assert!(matches!(
        board.release_drag(),
        DropOutcome::Committed { .. }
    ));

    board.begin_drag(9, Point::new(0.0, 0.0), 0.0).unwrap();
    board.move_drag(Point::new(64.0, 60.0)).unwrap();

    board.sync().await.unwrap();

    assert!(board.is_dragging());
    assert!(board.drag_context().unwrap().valid);
}

#[tokio::test]
async fn view_mode_toggle_replaces_the_surface_wholesale() {
    let (mut board, _notifier) = board_with(Box::new(StaticTransport { snapshot: seed() }));
    board.reload().await.unwrap();

    board.begin_drag(7, Point::new(0.0, 0.0), 0.0).unwrap();
    board.set_view_mode(Orientation::Vertical);

    assert_eq!(board.surface_config().orientation, Orientation::Vertical);
    assert!(!board.is_dragging());

    // Vertical mode: y is the time axis, x picks the lane.
    board.begin_drag(9, Point::new(0.0, 0.0), 0.0).unwrap();
    let context = board.move_drag(Point::new(10.0, 64.0)).unwrap();
    assert!(context.valid);
    assert_eq!(context.candidate_start, Some(t(9)));
    assert_eq!(context.candidate_resource, Some(1));
}
