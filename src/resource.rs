use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A bookable lane on the board (a bay, a person, a machine). The collection
/// is owned by the board and read-only from the drag core's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: i64,
    pub name: String,
    /// Server-side modification stamp, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<NaiveDateTime>,
}

impl Resource {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            modified: None,
        }
    }
}

/// Lookup by id; `None` means the reference is dangling and any drop candidate
/// pointing at it is invalid.
pub fn find_resource(resources: &[Resource], id: i64) -> Option<&Resource> {
    resources.iter().find(|resource| resource.id == id)
}
