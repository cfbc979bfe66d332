use crate::crud::SyncRequest;
use crate::task::{ScheduledTask, UnplannedItem};
use chrono::NaiveDateTime;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The item is not currently in the unplanned pool.
    UnknownItem(i64),
    /// A task with the same (case-sensitive) name is already scheduled; the
    /// scheduled set was left unchanged.
    DuplicateName(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::UnknownItem(id) => write!(f, "unplanned item {id} not found"),
            TransferError::DuplicateName(name) => {
                write!(f, "a scheduled task named \"{name}\" already exists")
            }
        }
    }
}

impl std::error::Error for TransferError {}

/// The two collections involved in a transfer: the ordered unplanned pool and
/// the scheduled set. An id belongs to exactly one of the two at any time.
/// Mutations happen remove-then-insert so a synchronous observer never sees a
/// transient duplicate.
#[derive(Debug, Default)]
pub struct TaskTransferStore {
    unplanned: Vec<UnplannedItem>,
    scheduled: Vec<ScheduledTask>,
    next_id: i64,
    pending_added: Vec<i64>,
    pending_removed: Vec<i64>,
}

impl TaskTransferStore {
    pub fn new() -> Self {
        Self {
            unplanned: Vec::new(),
            scheduled: Vec::new(),
            next_id: 1,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    pub fn with_collections(unplanned: Vec<UnplannedItem>, scheduled: Vec<ScheduledTask>) -> Self {
        let mut store = Self::new();
        store.unplanned = unplanned;
        store.scheduled = scheduled;
        store.reseed_allocator();
        store
    }

    pub fn unplanned(&self) -> &[UnplannedItem] {
        &self.unplanned
    }

    pub fn scheduled(&self) -> &[ScheduledTask] {
        &self.scheduled
    }

    pub fn unplanned_item(&self, id: i64) -> Option<&UnplannedItem> {
        self.unplanned.iter().find(|item| item.id == id)
    }

    pub fn scheduled_task(&self, id: i64) -> Option<&ScheduledTask> {
        self.scheduled.iter().find(|task| task.id == id)
    }

    pub fn contains_unplanned(&self, id: i64) -> bool {
        self.unplanned_item(id).is_some()
    }

    pub fn contains_scheduled(&self, id: i64) -> bool {
        self.scheduled_task(id).is_some()
    }

    /// Case-sensitive name lookup over the scheduled set.
    pub fn has_scheduled_name(&self, name: &str) -> bool {
        self.scheduled.iter().any(|task| task.name == name)
    }

    /// First scheduled task on `resource_id` whose occupancy overlaps
    /// `[start, end)`.
    pub fn task_at(
        &self,
        resource_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<&ScheduledTask> {
        self.scheduled
            .iter()
            .find(|task| task.resource_id == resource_id && task.overlaps(start, end))
    }

    /// Append a new item to the pool; the pool assigns the identifier from the
    /// shared allocator so ids stay unique across both collections.
    pub fn add_unplanned(
        &mut self,
        name: impl Into<String>,
        duration: i64,
        duration_unit: crate::task::DurationUnit,
    ) -> &UnplannedItem {
        let id = self.allocate_id();
        self.unplanned
            .push(UnplannedItem::new(id, name, duration, duration_unit));
        self.unplanned.last().expect("just pushed")
    }

    /// Insert an item that already carries an id (snapshot application).
    pub fn push_unplanned(&mut self, item: UnplannedItem) {
        self.next_id = self.next_id.max(item.id + 1);
        self.unplanned.push(item);
    }

    /// Move an item from the pool into the scheduled set. The pool removal
    /// happens first; on a duplicate name the scheduled set is left unchanged
    /// but the removal stands (see DESIGN.md).
    pub fn transfer(
        &mut self,
        item_id: i64,
        start: NaiveDateTime,
        resource_id: i64,
    ) -> Result<ScheduledTask, TransferError> {
        let position = self
            .unplanned
            .iter()
            .position(|item| item.id == item_id)
            .ok_or(TransferError::UnknownItem(item_id))?;
        let item = self.unplanned.remove(position);

        if self.has_scheduled_name(&item.name) {
            debug!(task_name = %item.name, "transfer suppressed: duplicate name");
            return Err(TransferError::DuplicateName(item.name));
        }

        let id = self.allocate_id();
        let task = ScheduledTask::from_item(id, &item, start, resource_id);
        self.scheduled.push(task.clone());
        self.pending_added.push(id);
        Ok(task)
    }

    pub fn remove_scheduled(&mut self, id: i64) -> Option<ScheduledTask> {
        let position = self.scheduled.iter().position(|task| task.id == id)?;
        let task = self.scheduled.remove(position);
        self.pending_removed.push(id);
        Some(task)
    }

    /// Replace the entire scheduled set from an external snapshot. Pending
    /// changes are dropped: the snapshot is authoritative.
    pub fn replace_scheduled(&mut self, scheduled: Vec<ScheduledTask>) {
        self.scheduled = scheduled;
        self.pending_added.clear();
        self.pending_removed.clear();
        self.reseed_allocator();
    }

    pub fn replace_unplanned(&mut self, unplanned: Vec<UnplannedItem>) {
        self.unplanned = unplanned;
        self.reseed_allocator();
    }

    /// Collect the changes accumulated since the last sync into a request.
    /// `restore_pending` puts them back if the sync fails.
    pub fn drain_pending(&mut self) -> SyncRequest {
        let added = self
            .pending_added
            .drain(..)
            .filter_map(|id| self.scheduled.iter().find(|task| task.id == id).cloned())
            .collect();
        let removed = std::mem::take(&mut self.pending_removed);
        SyncRequest {
            added,
            updated: Vec::new(),
            removed,
        }
    }

    pub fn restore_pending(&mut self, request: SyncRequest) {
        self.pending_added
            .extend(request.added.iter().map(|task| task.id));
        self.pending_removed.extend(request.removed);
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending_added.is_empty() || !self.pending_removed.is_empty()
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // Seed past every id in either collection; length-based schemes repeat
    // ids after deletions.
    fn reseed_allocator(&mut self) {
        let max_unplanned = self.unplanned.iter().map(|item| item.id).max().unwrap_or(0);
        let max_scheduled = self.scheduled.iter().map(|task| task.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_unplanned.max(max_scheduled) + 1);
    }
}
