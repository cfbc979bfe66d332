use crate::resource::{Resource, find_resource};
use crate::store::{TaskTransferStore, TransferError};
use crate::surface::{Orientation, ScheduleSurface, snap_timestamp};
use crate::task::{ScheduledTask, UnplannedItem};
use chrono::{Duration, NaiveDateTime};
use std::fmt;
use tracing::debug;

/// Pointer coordinate in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// When the uncentered proxy would extend less than this many pixels past the
/// pointer on its trailing edge, it is re-centered under the pointer instead
/// of keeping the grab anchor.
const RECENTER_THRESHOLD_PX: f64 = 20.0;

/// Geometry for the visual drag proxy, handed to the presentation layer at
/// gesture start. The proxy is sized like the scheduled bar the item would
/// become.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxySpec {
    pub width: f64,
    pub height: f64,
    /// Pixel offset of the pointer within the proxy along the time axis.
    pub grab_offset: f64,
}

/// Transient state for one gesture. Created by `begin`, refreshed on every
/// pointer move, destroyed on commit or abort.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub item: UnplannedItem,
    pub pointer: Point,
    pub proxy: ProxySpec,
    pub candidate_start: Option<NaiveDateTime>,
    pub candidate_resource: Option<i64>,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragError {
    /// `begin` was called while a gesture is already in progress.
    InvalidState,
    /// The dragged item is not currently in the unplanned pool.
    UnknownItem(i64),
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragError::InvalidState => write!(f, "a drag gesture is already in progress"),
            DragError::UnknownItem(id) => write!(f, "unplanned item {id} not found"),
        }
    }
}

impl std::error::Error for DragError {}

/// Result of releasing a gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Committed {
        task: ScheduledTask,
        /// Id of an existing scheduled task already occupying the drop slot,
        /// reported for user-facing notification. Co-located tasks are
        /// allowed; this never blocks the commit.
        covered: Option<i64>,
    },
    /// The scheduled set already held a task with the same name; it is left
    /// unchanged. The pool removal has still happened by the time this is
    /// returned.
    DuplicateSuppressed { name: String },
    Aborted,
}

/// Converts a raw pointer gesture into a validated, committable transfer
/// intent. One gesture at a time: `idle -> dragging -> {committed, aborted}
/// -> idle`. The gesture-recognition collaborator calls `begin`, `on_move`
/// and `on_release`; nothing here blocks.
pub struct DragController<S: ScheduleSurface> {
    surface: S,
    active: Option<DragContext>,
}

impl<S: ScheduleSurface> DragController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            active: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Replace the owned surface wholesale, e.g. when the view mode toggles.
    /// Any in-flight gesture is cancelled: its pixel space died with the old
    /// surface.
    pub fn set_surface(&mut self, surface: S) {
        if self.active.take().is_some() {
            debug!("drag gesture cancelled by surface replacement");
        }
        self.surface = surface;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn context(&self) -> Option<&DragContext> {
        self.active.as_ref()
    }

    /// Start a gesture over `item`. `grab_offset` is the pointer offset within
    /// the dragged row along the time axis. Returns the proxy geometry for the
    /// presentation layer; the context starts out invalid with null
    /// candidates.
    pub fn begin(
        &mut self,
        item: &UnplannedItem,
        pointer: Point,
        grab_offset: f64,
    ) -> Result<ProxySpec, DragError> {
        if self.active.is_some() {
            return Err(DragError::InvalidState);
        }

        let hours = item.duration_minutes() as f64 / 60.0;
        let bar_px = hours * self.surface.px_per_hour();
        let proxy = match self.surface.orientation() {
            Orientation::Horizontal => {
                let grab = if bar_px - grab_offset < RECENTER_THRESHOLD_PX {
                    bar_px / 2.0
                } else {
                    grab_offset
                };
                ProxySpec {
                    width: bar_px,
                    height: self.surface.lane_extent(),
                    grab_offset: grab,
                }
            }
            Orientation::Vertical => ProxySpec {
                width: self.surface.lane_extent(),
                height: bar_px,
                grab_offset: 0.0,
            },
        };

        self.active = Some(DragContext {
            item: item.clone(),
            pointer,
            proxy,
            candidate_start: None,
            candidate_resource: None,
            valid: false,
        });
        Ok(proxy)
    }

    /// Recompute the candidate slot under the pointer. Side-effect-free on the
    /// collections and idempotent; outside the droppable surface both
    /// candidates become null and validity drops. Quiet no-op while idle.
    pub fn on_move(&mut self, pointer: Point, resources: &[Resource]) -> Option<&DragContext> {
        let context = self.active.as_mut()?;
        context.pointer = pointer;

        let (along_px, cross_px) = match self.surface.orientation() {
            Orientation::Horizontal => (pointer.x - context.proxy.grab_offset, pointer.y),
            Orientation::Vertical => (pointer.y, pointer.x),
        };

        context.candidate_start = self
            .surface
            .time_at(along_px)
            .map(|timestamp| snap_timestamp(timestamp, self.surface.snap_minutes()));
        context.candidate_resource = self
            .surface
            .resource_at(cross_px)
            .filter(|id| find_resource(resources, *id).is_some());
        context.valid = context.candidate_start.is_some() && context.candidate_resource.is_some();

        Some(&*context)
    }

    /// End the gesture. An invalid context (or none at all, e.g. after a
    /// reload discarded it) aborts with both collections untouched; a valid
    /// one transfers the item remove-then-insert through the store.
    pub fn on_release(&mut self, store: &mut TaskTransferStore) -> DropOutcome {
        let Some(context) = self.active.take() else {
            return DropOutcome::Aborted;
        };
        if !context.valid {
            debug!(item = context.item.id, "drag aborted");
            return DropOutcome::Aborted;
        }
        let (Some(start), Some(resource_id)) = (context.candidate_start, context.candidate_resource)
        else {
            return DropOutcome::Aborted;
        };

        let end = start + Duration::minutes(context.item.duration_minutes());
        let covered = store.task_at(resource_id, start, end).map(|task| task.id);

        match store.transfer(context.item.id, start, resource_id) {
            Ok(task) => {
                debug!(task = task.id, resource = resource_id, %start, "drag committed");
                DropOutcome::Committed { task, covered }
            }
            Err(TransferError::DuplicateName(name)) => DropOutcome::DuplicateSuppressed { name },
            // Pool no longer holds the item (e.g. replaced behind our back);
            // nothing was mutated.
            Err(TransferError::UnknownItem(_)) => DropOutcome::Aborted,
        }
    }

    /// Discard any in-flight gesture without touching the collections. Used by
    /// reload; a later `on_release` becomes a no-op.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("drag gesture cancelled");
        }
    }
}
