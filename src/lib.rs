pub mod board;
pub mod crud;
pub mod drag;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod notify;
pub mod persistence;
pub mod resource;
pub mod store;
pub mod surface;
pub mod task;
pub(crate) mod task_validation;

pub use board::PlanBoard;
pub use crud::{BoardSnapshot, CrudError, CrudTransport, FileTransport, LoadParams, SyncRequest};
pub use drag::{DragContext, DragController, DragError, DropOutcome, Point, ProxySpec};
pub use notify::{
    DEFAULT_TOAST_TIMEOUT_MS, LogNotifier, MemoryNotifier, Notification, Notifier, Severity,
};
#[cfg(feature = "sqlite")]
pub use persistence::SqliteBoardStore;
pub use persistence::{
    BoardStore, PersistenceError, export_events_to_csv, import_events_from_csv,
    load_board_from_json, save_board_to_json, validate_snapshot,
};
pub use resource::{Resource, find_resource};
pub use store::{TaskTransferStore, TransferError};
pub use surface::{Orientation, ScheduleSurface, SurfaceConfig, TimelineSurface, snap_timestamp};
pub use task::{DurationUnit, ScheduledTask, UnplannedItem};
