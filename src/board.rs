use crate::crud::{BoardSnapshot, CrudError, CrudTransport, LoadParams};
use crate::drag::{DragContext, DragController, DragError, DropOutcome, Point, ProxySpec};
use crate::notify::{DEFAULT_TOAST_TIMEOUT_MS, Notifier, Severity};
use crate::resource::Resource;
use crate::store::TaskTransferStore;
use crate::surface::{Orientation, SurfaceConfig, TimelineSurface};
use tracing::{debug, warn};

/// Owning context for one planning board: the resource collection, the two
/// task collections, the drag controller and the CRUD collaborator. View-mode
/// toggles replace the controller's surface wholesale instead of mutating a
/// shared widget reference.
pub struct PlanBoard {
    config: SurfaceConfig,
    resources: Vec<Resource>,
    store: TaskTransferStore,
    controller: DragController<TimelineSurface>,
    transport: Box<dyn CrudTransport>,
    notifier: Box<dyn Notifier>,
}

impl PlanBoard {
    pub fn new(
        config: SurfaceConfig,
        transport: Box<dyn CrudTransport>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let controller = DragController::new(TimelineSurface::new(config.clone(), Vec::new()));
        Self {
            config,
            resources: Vec::new(),
            store: TaskTransferStore::new(),
            controller,
            transport,
            notifier,
        }
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn store(&self) -> &TaskTransferStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskTransferStore {
        &mut self.store
    }

    pub fn surface_config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn drag_context(&self) -> Option<&DragContext> {
        self.controller.context()
    }

    /// Toggle between horizontal and vertical mode. The surface is rebuilt
    /// from config and swapped into the controller whole, which cancels any
    /// gesture in flight.
    pub fn set_view_mode(&mut self, orientation: Orientation) {
        self.config.orientation = orientation;
        self.rebuild_surface();
    }

    pub async fn reload(&mut self) -> Result<(), CrudError> {
        self.load(LoadParams::default()).await
    }

    /// Ask the backend to restore its seed data, then take the result.
    pub async fn reset(&mut self) -> Result<(), CrudError> {
        self.load(LoadParams::reset()).await
    }

    async fn load(&mut self, params: LoadParams) -> Result<(), CrudError> {
        // Any gesture in flight dies silently; its candidates point into
        // collections that are about to be replaced.
        self.controller.cancel();
        match self.transport.load(&params).await {
            Ok(snapshot) => {
                self.apply_snapshot(snapshot);
                let message = if params.reset {
                    "Database was reset"
                } else {
                    "Data reloaded"
                };
                self.notifier
                    .notify(message, Severity::Info, DEFAULT_TOAST_TIMEOUT_MS);
                Ok(())
            }
            Err(err) => {
                warn!(action = err.action(), "crud request failed");
                self.notifier
                    .notify(&err.toast_text(), Severity::Error, DEFAULT_TOAST_TIMEOUT_MS);
                Err(err)
            }
        }
    }

    /// Push accumulated changes to the backend. Fire-and-forget relative to
    /// any gesture: the controller is never touched. Failed changes are
    /// re-queued for the next manual attempt.
    pub async fn sync(&mut self) -> Result<(), CrudError> {
        let request = self.store.drain_pending();
        if request.is_empty() {
            return Ok(());
        }
        match self.transport.sync(&request).await {
            Ok(()) => {
                debug!(
                    added = request.added.len(),
                    removed = request.removed.len(),
                    "sync committed"
                );
                Ok(())
            }
            Err(err) => {
                self.store.restore_pending(request);
                warn!(action = err.action(), "crud request failed");
                self.notifier
                    .notify(&err.toast_text(), Severity::Error, DEFAULT_TOAST_TIMEOUT_MS);
                Err(err)
            }
        }
    }

    pub fn begin_drag(
        &mut self,
        item_id: i64,
        pointer: Point,
        grab_offset: f64,
    ) -> Result<ProxySpec, DragError> {
        let item = self
            .store
            .unplanned_item(item_id)
            .cloned()
            .ok_or(DragError::UnknownItem(item_id))?;
        self.controller.begin(&item, pointer, grab_offset)
    }

    pub fn move_drag(&mut self, pointer: Point) -> Option<DragContext> {
        self.controller.on_move(pointer, &self.resources).cloned()
    }

    /// Abandon the gesture without releasing it over the surface.
    pub fn cancel_drag(&mut self) {
        self.controller.cancel();
    }

    pub fn release_drag(&mut self) -> DropOutcome {
        let outcome = self.controller.on_release(&mut self.store);
        if let DropOutcome::Committed {
            task,
            covered: Some(covered_id),
        } = &outcome
        {
            if let Some(covered) = self.store.scheduled_task(*covered_id) {
                let message =
                    format!("Dropped \"{}\" on top of \"{}\"", task.name, covered.name);
                self.notifier
                    .notify(&message, Severity::Info, DEFAULT_TOAST_TIMEOUT_MS);
            }
        }
        outcome
    }

    fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.resources = snapshot.resources;
        self.store.replace_scheduled(snapshot.events);
        // A load answers with resources and events; only seed snapshots carry
        // the unplanned pool, so an empty list leaves the pool alone.
        if !snapshot.unplanned.is_empty() {
            self.store.replace_unplanned(snapshot.unplanned);
        }
        self.rebuild_surface();
    }

    fn rebuild_surface(&mut self) {
        let lanes = self.resources.iter().map(|resource| resource.id).collect();
        self.controller
            .set_surface(TimelineSurface::new(self.config.clone(), lanes));
    }
}
