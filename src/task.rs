use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit for task duration magnitudes. The wire format uses the long names,
/// the short aliases cover data produced by older exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    #[serde(alias = "min")]
    Minute,
    #[serde(alias = "h")]
    Hour,
    #[serde(alias = "d")]
    Day,
}

impl DurationUnit {
    pub fn minutes(&self) -> i64 {
        match self {
            DurationUnit::Minute => 1,
            DurationUnit::Hour => 60,
            DurationUnit::Day => 24 * 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationUnit::Minute => "minute",
            DurationUnit::Hour => "hour",
            DurationUnit::Day => "day",
        }
    }

    /// Short suffix used when rendering durations ("1h", "30min").
    pub fn suffix(&self) -> &'static str {
        match self {
            DurationUnit::Minute => "min",
            DurationUnit::Hour => "h",
            DurationUnit::Day => "d",
        }
    }
}

impl Default for DurationUnit {
    fn default() -> Self {
        DurationUnit::Hour
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An item waiting in the unplanned pool: it has a duration but no start time
/// and no resource yet. Immutable once created, apart from being removed from
/// the pool when it is transferred onto the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplannedItem {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    #[serde(default)]
    pub duration_unit: DurationUnit,
    /// Category icon class, carried through for the presentation layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_cls: Option<String>,
}

impl UnplannedItem {
    pub fn new(id: i64, name: impl Into<String>, duration: i64, duration_unit: DurationUnit) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            duration_unit,
            icon_cls: None,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration * self.duration_unit.minutes()
    }
}

/// A task bound to a start timestamp and a resource lane. Only ever created by
/// transferring an [`UnplannedItem`]; an id in the scheduled set is never
/// simultaneously present in the unplanned pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDateTime,
    pub duration: i64,
    #[serde(default)]
    pub duration_unit: DurationUnit,
    /// Foreign key into the resource collection owned by the board.
    pub resource_id: i64,
}

impl ScheduledTask {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        start_date: NaiveDateTime,
        duration: i64,
        duration_unit: DurationUnit,
        resource_id: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start_date,
            duration,
            duration_unit,
            resource_id,
        }
    }

    /// Build the scheduled counterpart of an unplanned item. The id comes from
    /// the store's allocator, name and duration carry over unchanged.
    pub fn from_item(
        id: i64,
        item: &UnplannedItem,
        start_date: NaiveDateTime,
        resource_id: i64,
    ) -> Self {
        Self {
            id,
            name: item.name.clone(),
            start_date,
            duration: item.duration,
            duration_unit: item.duration_unit,
            resource_id,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration * self.duration_unit.minutes()
    }

    pub fn end_date(&self) -> NaiveDateTime {
        self.start_date + Duration::minutes(self.duration_minutes())
    }

    /// Half-open interval overlap against another occupancy window.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_date < end && start < self.end_date()
    }
}
