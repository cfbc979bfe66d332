use crate::crud::BoardSnapshot;
use crate::resource::find_resource;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct SnapshotValidationError {
    message: String,
}

impl SnapshotValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SnapshotValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SnapshotValidationError {}

/// Sanity checks applied at persistence boundaries. Ids must be unique across
/// both collections — an id scheduled and unplanned at the same time breaks
/// the single-ownership invariant before the board ever runs.
pub fn validate_snapshot(snapshot: &BoardSnapshot) -> Result<(), SnapshotValidationError> {
    let mut resource_ids = HashSet::with_capacity(snapshot.resources.len());
    for resource in &snapshot.resources {
        if resource.name.trim().is_empty() {
            return Err(SnapshotValidationError::new(format!(
                "resource {} requires a non-empty name",
                resource.id
            )));
        }
        if !resource_ids.insert(resource.id) {
            return Err(SnapshotValidationError::new(format!(
                "duplicate resource id {}",
                resource.id
            )));
        }
    }

    let mut seen_ids = HashSet::with_capacity(snapshot.events.len() + snapshot.unplanned.len());

    for task in &snapshot.events {
        if task.name.trim().is_empty() {
            return Err(SnapshotValidationError::new(format!(
                "scheduled task {} requires a non-empty name",
                task.id
            )));
        }
        if task.duration <= 0 {
            return Err(SnapshotValidationError::new(format!(
                "scheduled task {} has non-positive duration {}",
                task.id, task.duration
            )));
        }
        if !snapshot.resources.is_empty()
            && find_resource(&snapshot.resources, task.resource_id).is_none()
        {
            return Err(SnapshotValidationError::new(format!(
                "scheduled task {} references unknown resource {}",
                task.id, task.resource_id
            )));
        }
        if !seen_ids.insert(task.id) {
            return Err(SnapshotValidationError::new(format!(
                "duplicate task id {}",
                task.id
            )));
        }
    }

    for item in &snapshot.unplanned {
        if item.name.trim().is_empty() {
            return Err(SnapshotValidationError::new(format!(
                "unplanned item {} requires a non-empty name",
                item.id
            )));
        }
        if item.duration <= 0 {
            return Err(SnapshotValidationError::new(format!(
                "unplanned item {} has non-positive duration {}",
                item.id, item.duration
            )));
        }
        if !seen_ids.insert(item.id) {
            return Err(SnapshotValidationError::new(format!(
                "id {} present in both the unplanned pool and the scheduled set",
                item.id
            )));
        }
    }

    Ok(())
}
