use super::{BoardStore, PersistenceResult};
use crate::crud::BoardSnapshot;
use crate::resource::Resource;
use crate::task::{ScheduledTask, UnplannedItem};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

/// Board persistence over sqlite, one JSON document per row. A single meta
/// row distinguishes "never saved" from "saved an empty board" and carries a
/// revision counter bumped on every save.
pub struct SqliteBoardStore {
    connection: Mutex<Connection>,
}

impl SqliteBoardStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS board_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                revision INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS board_resources (
                id INTEGER PRIMARY KEY,
                resource_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS board_events (
                id INTEGER PRIMARY KEY,
                event_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS board_unplanned (
                id INTEGER PRIMARY KEY,
                item_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    pub fn revision(&self) -> PersistenceResult<Option<i64>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare("SELECT revision FROM board_meta WHERE id = 1")?;
        let revision = stmt.query_row([], |row| row.get(0)).optional()?;
        Ok(revision)
    }
}

impl BoardStore for SqliteBoardStore {
    fn save_board(&self, snapshot: &BoardSnapshot) -> PersistenceResult<()> {
        super::validate_snapshot(snapshot)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO board_meta (id, revision) VALUES (1, 1)
             ON CONFLICT (id) DO UPDATE SET revision = revision + 1",
            [],
        )?;

        tx.execute("DELETE FROM board_resources", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO board_resources (id, resource_json) VALUES (?1, ?2)")?;
            for resource in &snapshot.resources {
                stmt.execute(params![resource.id, serde_json::to_string(resource)?])?;
            }
        }

        tx.execute("DELETE FROM board_events", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO board_events (id, event_json) VALUES (?1, ?2)")?;
            for task in &snapshot.events {
                stmt.execute(params![task.id, serde_json::to_string(task)?])?;
            }
        }

        tx.execute("DELETE FROM board_unplanned", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO board_unplanned (id, item_json) VALUES (?1, ?2)")?;
            for item in &snapshot.unplanned {
                stmt.execute(params![item.id, serde_json::to_string(item)?])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_board(&self) -> PersistenceResult<Option<BoardSnapshot>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT revision FROM board_meta WHERE id = 1")?;
        let revision: Option<i64> = stmt.query_row([], |row| row.get(0)).optional()?;
        if revision.is_none() {
            return Ok(None);
        }

        let mut snapshot = BoardSnapshot::default();

        let mut stmt =
            conn.prepare("SELECT resource_json FROM board_resources ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for json in rows {
            let resource: Resource = serde_json::from_str(&json?)?;
            snapshot.resources.push(resource);
        }

        let mut stmt = conn.prepare("SELECT event_json FROM board_events ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for json in rows {
            let task: ScheduledTask = serde_json::from_str(&json?)?;
            snapshot.events.push(task);
        }

        let mut stmt = conn.prepare("SELECT item_json FROM board_unplanned ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for json in rows {
            let item: UnplannedItem = serde_json::from_str(&json?)?;
            snapshot.unplanned.push(item);
        }

        super::validate_snapshot(&snapshot)?;
        Ok(Some(snapshot))
    }
}
