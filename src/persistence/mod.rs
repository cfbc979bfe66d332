use crate::crud::BoardSnapshot;
use crate::task_validation;
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    InvalidData(String),
    NotFound,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::NotFound => write!(f, "no board stored"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable storage for the whole board, pluggable behind the HTTP backend.
pub trait BoardStore {
    fn save_board(&self, snapshot: &BoardSnapshot) -> PersistenceResult<()>;
    fn load_board(&self) -> PersistenceResult<Option<BoardSnapshot>>;
}

pub fn validate_snapshot(snapshot: &BoardSnapshot) -> PersistenceResult<()> {
    task_validation::validate_snapshot(snapshot)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    export_events_to_csv, import_events_from_csv, load_board_from_json, save_board_to_json,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBoardStore;
