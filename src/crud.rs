use crate::persistence::{self, PersistenceError};
use crate::resource::Resource;
use crate::task::{DurationUnit, ScheduledTask, UnplannedItem};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Parameters for a load request. `reset` asks the backend to restore its
/// seed data before answering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadParams {
    #[serde(default)]
    pub reset: bool,
}

impl LoadParams {
    pub fn reset() -> Self {
        Self { reset: true }
    }
}

/// Full board state as it travels over the transport: the resource rows, the
/// scheduled events and the unplanned pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub events: Vec<ScheduledTask>,
    #[serde(default)]
    pub unplanned: Vec<UnplannedItem>,
}

impl BoardSnapshot {
    /// The demo data set: a handful of service bays and the classic unplanned
    /// backlog. Used as a fallback seed when no data file is configured.
    pub fn demo() -> Self {
        let items = [
            (1, "Fun task", 4, "b-fa b-fa-fw b-fa-beer"),
            (2, "Medium fun task", 8, "b-fa b-fa-fw b-fa-cog"),
            (3, "Outright boring task", 2, "b-fa b-fa-fw b-fa-book"),
            (4, "Inspiring task", 2, "b-fa b-fa-fw b-fa-book"),
            (5, "Mysterious task", 2, "b-fa b-fa-fw b-fa-question"),
            (6, "Answer forum question", 4, "b-fa b-fa-fw b-fa-life-ring"),
            (7, "Gym", 1, "b-fa b-fa-fw b-fa-dumbbell"),
            (9, "Book flight", 7, "b-fa b-fa-fw b-fa-plane"),
            (10, "Customer support call", 3, "b-fa b-fa-fw b-fa-phone"),
            (11, "Angular bug fix", 3, "b-fa b-fa-fw b-fa-bug"),
            (12, "React feature fix", 2, "b-fa b-fa-fw b-fa-cog"),
        ];
        Self {
            resources: vec![
                Resource::new(1, "Volvo V90"),
                Resource::new(2, "BMW M3"),
                Resource::new(3, "Peugeot 308"),
                Resource::new(4, "Tesla Model Y"),
            ],
            events: Vec::new(),
            unplanned: items
                .into_iter()
                .map(|(id, name, duration, icon)| {
                    let mut item = UnplannedItem::new(id, name, duration, DurationUnit::Hour);
                    item.icon_cls = Some(icon.to_string());
                    item
                })
                .collect(),
        }
    }
}

/// Changes accumulated since the last sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub added: Vec<ScheduledTask>,
    #[serde(default)]
    pub updated: Vec<ScheduledTask>,
    #[serde(default)]
    pub removed: Vec<i64>,
}

impl SyncRequest {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// A failed load or sync. Non-fatal: reported to the user, retried manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudError {
    LoadFailure { message: Option<String> },
    SyncFailure { message: Option<String> },
}

impl CrudError {
    pub fn action(&self) -> &'static str {
        match self {
            CrudError::LoadFailure { .. } => "load",
            CrudError::SyncFailure { .. } => "sync",
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            CrudError::LoadFailure { message } | CrudError::SyncFailure { message } => {
                message.as_deref()
            }
        }
    }

    /// User-facing failure text, e.g.
    /// `Action "load" failed. Server response: no such table`.
    pub fn toast_text(&self) -> String {
        match self.server_message() {
            Some(server) => format!(
                "Action \"{}\" failed. Server response: {server}",
                self.action()
            ),
            None => format!("Action \"{}\" failed.", self.action()),
        }
    }
}

impl fmt::Display for CrudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.toast_text())
    }
}

impl std::error::Error for CrudError {}

/// The asynchronous CRUD collaborator. Both operations resolve or reject;
/// neither blocks the gesture thread, and the core performs no automatic
/// retry.
#[async_trait]
pub trait CrudTransport: Send + Sync {
    async fn load(&self, params: &LoadParams) -> Result<BoardSnapshot, CrudError>;
    async fn sync(&self, request: &SyncRequest) -> Result<(), CrudError>;
}

/// JSON-file-backed transport: `load` reads the snapshot, `sync` writes the
/// current board state back. With a seed path configured, `reset` loads the
/// pristine seed instead.
pub struct FileTransport {
    data_path: PathBuf,
    seed_path: Option<PathBuf>,
}

impl FileTransport {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            seed_path: None,
        }
    }

    pub fn with_seed(data_path: impl Into<PathBuf>, seed_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            seed_path: Some(seed_path.into()),
        }
    }

    fn load_failure(err: PersistenceError) -> CrudError {
        CrudError::LoadFailure {
            message: Some(err.to_string()),
        }
    }
}

#[async_trait]
impl CrudTransport for FileTransport {
    async fn load(&self, params: &LoadParams) -> Result<BoardSnapshot, CrudError> {
        let path = match (&self.seed_path, params.reset) {
            (Some(seed), true) => seed,
            _ => &self.data_path,
        };
        let snapshot = persistence::load_board_from_json(path).map_err(Self::load_failure)?;
        if params.reset {
            persistence::save_board_to_json(&snapshot, &self.data_path)
                .map_err(Self::load_failure)?;
        }
        Ok(snapshot)
    }

    async fn sync(&self, request: &SyncRequest) -> Result<(), CrudError> {
        let mut snapshot =
            persistence::load_board_from_json(&self.data_path).map_err(|err| {
                CrudError::SyncFailure {
                    message: Some(err.to_string()),
                }
            })?;

        for task in &request.added {
            snapshot.events.push(task.clone());
        }
        for task in &request.updated {
            if let Some(existing) = snapshot.events.iter_mut().find(|event| event.id == task.id) {
                *existing = task.clone();
            }
        }
        snapshot
            .events
            .retain(|event| !request.removed.contains(&event.id));

        persistence::save_board_to_json(&snapshot, &self.data_path).map_err(|err| {
            CrudError::SyncFailure {
                message: Some(err.to_string()),
            }
        })
    }
}
