use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Direction of the time axis on the rendering surface. Horizontal mode lays
/// resources out as rows, vertical mode as columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Geometry of the rendered timeline, kept as plain data so a board can be
/// torn down and rebuilt with a different orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    pub orientation: Orientation,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    /// Pixel-per-hour scale along the time axis.
    pub px_per_hour: f64,
    /// Row height in horizontal mode, column width in vertical mode.
    pub lane_extent: f64,
    /// Schedulable granularity; drop candidates are rounded to the nearest
    /// multiple of this many minutes.
    pub snap_minutes: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        let start = chrono::NaiveDate::from_ymd_opt(2025, 12, 1)
            .expect("invalid default surface date")
            .and_hms_opt(8, 0, 0)
            .expect("invalid default surface time");
        Self {
            orientation: Orientation::Horizontal,
            start_date: start,
            end_date: start + Duration::hours(10),
            px_per_hour: 64.0,
            lane_extent: 50.0,
            snap_minutes: 30,
        }
    }
}

impl SurfaceConfig {
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Rendered length of the time axis in pixels.
    pub fn axis_px(&self) -> f64 {
        let minutes = (self.end_date - self.start_date).num_minutes();
        minutes as f64 / 60.0 * self.px_per_hour
    }
}

/// The rendering surface as the drag core sees it: a pure pixel-to-time
/// mapping plus lane resolution. Implementations own layout; the controller
/// treats them as a black box.
pub trait ScheduleSurface {
    fn orientation(&self) -> Orientation;

    /// Inverse-map a pixel offset along the time axis to a timestamp. `None`
    /// when the offset falls outside the rendered window.
    fn time_at(&self, offset_px: f64) -> Option<NaiveDateTime>;

    /// Resolve which resource lane the cross-axis coordinate overlaps.
    fn resource_at(&self, cross_px: f64) -> Option<i64>;

    fn px_per_hour(&self) -> f64;

    fn lane_extent(&self) -> f64;

    fn snap_minutes(&self) -> u32;
}

/// Round a timestamp to the nearest multiple of `snap_minutes` within its day.
/// Rounding may carry across midnight.
pub fn snap_timestamp(timestamp: NaiveDateTime, snap_minutes: u32) -> NaiveDateTime {
    if snap_minutes == 0 {
        return timestamp;
    }
    let midnight = timestamp.date().and_time(NaiveTime::MIN);
    let minutes_into_day = timestamp.time().num_seconds_from_midnight() as f64 / 60.0;
    let steps = (minutes_into_day / snap_minutes as f64).round() as i64;
    midnight + Duration::minutes(steps * snap_minutes as i64)
}

/// Linear time axis with uniformly sized resource lanes, in either
/// orientation. Lanes follow the display order of the resource collection.
#[derive(Debug, Clone)]
pub struct TimelineSurface {
    config: SurfaceConfig,
    lanes: Vec<i64>,
}

impl TimelineSurface {
    pub fn new(config: SurfaceConfig, lanes: Vec<i64>) -> Self {
        Self { config, lanes }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn lanes(&self) -> &[i64] {
        &self.lanes
    }
}

impl ScheduleSurface for TimelineSurface {
    fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    fn time_at(&self, offset_px: f64) -> Option<NaiveDateTime> {
        if !offset_px.is_finite() || offset_px < 0.0 || offset_px > self.config.axis_px() {
            return None;
        }
        let minutes = offset_px / self.config.px_per_hour * 60.0;
        Some(self.config.start_date + Duration::minutes(minutes as i64))
    }

    fn resource_at(&self, cross_px: f64) -> Option<i64> {
        if !cross_px.is_finite() || cross_px < 0.0 {
            return None;
        }
        let index = (cross_px / self.config.lane_extent) as usize;
        self.lanes.get(index).copied()
    }

    fn px_per_hour(&self) -> f64 {
        self.config.px_per_hour
    }

    fn lane_extent(&self) -> f64 {
        self.config.lane_extent
    }

    fn snap_minutes(&self) -> u32 {
        self.config.snap_minutes
    }
}
