use chrono::{NaiveDate, NaiveDateTime};
use planboard::{Orientation, ScheduleSurface, SurfaceConfig, TimelineSurface, snap_timestamp};

fn dt(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn surface() -> TimelineSurface {
    let config = SurfaceConfig {
        orientation: Orientation::Horizontal,
        start_date: dt(1, 8, 0),
        end_date: dt(1, 18, 0),
        px_per_hour: 60.0,
        lane_extent: 50.0,
        snap_minutes: 30,
    };
    TimelineSurface::new(config, vec![10, 20, 30])
}

#[test]
fn time_at_maps_pixels_linearly() {
    let surface = surface();
    assert_eq!(surface.time_at(0.0), Some(dt(1, 8, 0)));
    assert_eq!(surface.time_at(90.0), Some(dt(1, 9, 30)));
    assert_eq!(surface.time_at(600.0), Some(dt(1, 18, 0)));
}

#[test]
fn time_at_is_none_outside_the_window() {
    let surface = surface();
    assert_eq!(surface.time_at(-1.0), None);
    assert_eq!(surface.time_at(601.0), None);
    assert_eq!(surface.time_at(f64::NAN), None);
}

#[test]
fn resource_at_resolves_lane_order() {
    let surface = surface();
    assert_eq!(surface.resource_at(0.0), Some(10));
    assert_eq!(surface.resource_at(49.9), Some(10));
    assert_eq!(surface.resource_at(50.0), Some(20));
    assert_eq!(surface.resource_at(125.0), Some(30));
}

#[test]
fn resource_at_is_none_past_the_last_lane() {
    let surface = surface();
    assert_eq!(surface.resource_at(150.0), None);
    assert_eq!(surface.resource_at(-0.1), None);
}

#[test]
fn snapping_rounds_to_nearest_step() {
    assert_eq!(snap_timestamp(dt(1, 9, 13), 30), dt(1, 9, 0));
    assert_eq!(snap_timestamp(dt(1, 9, 20), 30), dt(1, 9, 30));
    assert_eq!(snap_timestamp(dt(1, 9, 45), 30), dt(1, 10, 0));
    assert_eq!(snap_timestamp(dt(1, 9, 7), 15), dt(1, 9, 0));
}

#[test]
fn snapping_carries_across_midnight() {
    assert_eq!(snap_timestamp(dt(1, 23, 50), 30), dt(2, 0, 0));
}

#[test]
fn zero_granularity_disables_snapping() {
    assert_eq!(snap_timestamp(dt(1, 9, 13), 0), dt(1, 9, 13));
}

#[test]
fn axis_px_covers_the_configured_window() {
    assert_eq!(surface().config().axis_px(), 600.0);
}
