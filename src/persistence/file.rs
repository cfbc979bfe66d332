use super::{PersistenceError, PersistenceResult};
use crate::crud::BoardSnapshot;
use crate::task::{DurationUnit, ScheduledTask};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

const CSV_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn save_board_to_json<P: AsRef<Path>>(
    snapshot: &BoardSnapshot,
    path: P,
) -> PersistenceResult<()> {
    super::validate_snapshot(snapshot)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_board_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<BoardSnapshot> {
    let file = File::open(path)?;
    let snapshot: BoardSnapshot = serde_json::from_reader(file)?;
    super::validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

#[derive(Serialize, Deserialize)]
struct EventCsvRecord {
    id: i64,
    name: String,
    start_date: String,
    duration: i64,
    duration_unit: String,
    resource_id: i64,
}

impl From<&ScheduledTask> for EventCsvRecord {
    fn from(task: &ScheduledTask) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            start_date: task.start_date.format(CSV_DATE_FORMAT).to_string(),
            duration: task.duration,
            duration_unit: task.duration_unit.as_str().to_string(),
            resource_id: task.resource_id,
        }
    }
}

impl EventCsvRecord {
    fn into_task(self) -> PersistenceResult<ScheduledTask> {
        let start_date = NaiveDateTime::parse_from_str(&self.start_date, CSV_DATE_FORMAT)
            .map_err(|err| {
                PersistenceError::InvalidData(format!(
                    "task {} has unparseable start date \"{}\": {err}",
                    self.id, self.start_date
                ))
            })?;
        let duration_unit = match self.duration_unit.as_str() {
            "minute" | "min" => DurationUnit::Minute,
            "hour" | "h" => DurationUnit::Hour,
            "day" | "d" => DurationUnit::Day,
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "task {} has unknown duration unit \"{other}\"",
                    self.id
                )));
            }
        };
        Ok(ScheduledTask::new(
            self.id,
            self.name,
            start_date,
            self.duration,
            duration_unit,
            self.resource_id,
        ))
    }
}

/// Flat CSV export of the scheduled set, one row per task.
pub fn export_events_to_csv<P: AsRef<Path>>(
    events: &[ScheduledTask],
    path: P,
) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for task in events {
        writer.serialize(EventCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn import_events_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ScheduledTask>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut events = Vec::new();
    for record in reader.deserialize::<EventCsvRecord>() {
        events.push(record?.into_task()?);
    }
    Ok(events)
}
