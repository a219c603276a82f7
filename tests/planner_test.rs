//! Window planning tests: hour prefixes and window clamping.

use chrono::{DateTime, Duration, TimeZone, Utc};

use clipmerge::camera::CameraId;
use clipmerge::planner::{plan_prefixes, MergeWindow};

const IST: i32 = 330;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid utc time")
}

fn cam(s: &str) -> CameraId {
    s.parse().expect("camera")
}

fn as_strings(prefixes: &[clipmerge::planner::StoragePrefix]) -> Vec<&str> {
    prefixes.iter().map(|p| p.as_str()).collect()
}

#[test]
fn test_zero_length_window_yields_one_prefix() {
    let t = utc(2025, 10, 26, 3, 47, 12);
    let prefixes = plan_prefixes(cam("cam1"), t, t, IST);
    assert_eq!(as_strings(&prefixes), ["cam1/2025/10/26/09/"]);
}

#[test]
fn test_two_hours_from_local_boundary_yields_three_prefixes() {
    // 09:00 IST.
    let start = utc(2025, 10, 26, 3, 30, 0);
    let end = start + Duration::hours(2);
    let prefixes = plan_prefixes(cam("cam2"), start, end, IST);
    assert_eq!(
        as_strings(&prefixes),
        ["cam2/2025/10/26/09/", "cam2/2025/10/26/10/", "cam2/2025/10/26/11/"]
    );
}

#[test]
fn test_window_inside_one_hour_yields_one_prefix() {
    let start = utc(2025, 10, 26, 3, 40, 0); // 09:10 IST
    let end = utc(2025, 10, 26, 4, 20, 0); // 09:50 IST
    let prefixes = plan_prefixes(cam("cam1"), start, end, IST);
    assert_eq!(as_strings(&prefixes), ["cam1/2025/10/26/09/"]);
}

#[test]
fn test_mid_hour_start_includes_partial_last_hour() {
    let start = utc(2025, 10, 26, 3, 50, 0); // 09:20 IST
    let end = start + Duration::hours(1); // 10:20 IST
    let prefixes = plan_prefixes(cam("cam1"), start, end, IST);
    assert_eq!(as_strings(&prefixes), ["cam1/2025/10/26/09/", "cam1/2025/10/26/10/"]);
}

#[test]
fn test_prefixes_roll_over_day_month_and_year() {
    // 23:30 IST on Dec 31st for one hour.
    let start = utc(2024, 12, 31, 18, 0, 0);
    let end = start + Duration::hours(1);
    let prefixes = plan_prefixes(cam("cam1"), start, end, IST);
    assert_eq!(as_strings(&prefixes), ["cam1/2024/12/31/23/", "cam1/2025/01/01/00/"]);
}

#[test]
fn test_negative_offset() {
    // 01:15 UTC is 20:15 the previous day at UTC-5.
    let start = utc(2025, 3, 1, 1, 15, 0);
    let prefixes = plan_prefixes(cam("cam3"), start, start, -300);
    assert_eq!(as_strings(&prefixes), ["cam3/2025/02/28/20/"]);
}

#[test]
fn test_start_after_end_still_yields_start_prefix() {
    let start = utc(2025, 10, 26, 3, 30, 0);
    let end = start - Duration::hours(3);
    let prefixes = plan_prefixes(cam("cam1"), start, end, IST);
    assert_eq!(as_strings(&prefixes), ["cam1/2025/10/26/09/"]);
}

#[test]
fn test_prefixes_are_distinct_and_chronological() {
    let start = utc(2025, 10, 25, 22, 5, 0);
    let end = start + Duration::hours(30);
    let prefixes = plan_prefixes(cam("cam2"), start, end, IST);
    assert_eq!(prefixes.len(), 31);
    let mut sorted = prefixes.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, prefixes);
}

#[test]
fn test_window_end_is_clamped_to_now() {
    let now = utc(2025, 10, 26, 4, 0, 0);
    let start = now - Duration::minutes(10);
    let w = MergeWindow::new(cam("cam1"), start, 3600, now).expect("window");
    assert_eq!(w.start, start);
    assert_eq!(w.end, now);

    let w = MergeWindow::new(cam("cam1"), start - Duration::hours(5), 600, now).expect("window");
    assert_eq!(w.end, start - Duration::hours(5) + Duration::seconds(600));
}

#[test]
fn test_zero_duration_is_invalid() {
    let now = utc(2025, 10, 26, 4, 0, 0);
    let err = MergeWindow::new(cam("cam1"), now, 0, now).expect_err("zero duration");
    assert!(err.is_invalid_input());
}
