//! Time/key codec and camera identifier tests.
//!
//! Run with: `cargo test`

use chrono::{DateTime, TimeZone, Utc};

use clipmerge::camera::{CameraId, CameraInput};
use clipmerge::timekey::{
    fields_to_local_instant, format_filename_stamp, parse_clip_instant, parse_start_text,
    to_local_fields, StartTime,
};

const IST: i32 = 330;

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid utc time")
}

#[test]
fn test_local_fields_round_trip() {
    let instants = [
        utc(2025, 10, 26, 3, 30, 0),
        utc(2024, 2, 29, 23, 59, 59),
        utc(1999, 12, 31, 18, 45, 12),
        Utc.timestamp_millis_opt(1_761_449_400_123).single().expect("millis"),
    ];
    for t in instants {
        for offset in [IST, 0, -300, -720, 840, 1439, -1439] {
            let fields = to_local_fields(t, offset);
            assert_eq!(
                fields_to_local_instant(fields, offset),
                Some(t),
                "round trip failed for {t} at offset {offset}"
            );
        }
    }
}

#[test]
fn test_local_fields_cross_midnight() {
    // 20:00 UTC is 01:30 next day in IST.
    let f = to_local_fields(utc(2024, 12, 31, 20, 0, 0), IST);
    assert_eq!((f.year, f.month, f.day, f.hour, f.minute), (2025, 1, 1, 1, 30));
}

#[test]
fn test_filename_stamp_is_zero_padded_local_time() {
    assert_eq!(format_filename_stamp(utc(2025, 10, 26, 3, 30, 0), IST), "2025_10_26_09_00_00");
    assert_eq!(format_filename_stamp(utc(2025, 1, 2, 3, 4, 5), 0), "2025_01_02_03_04_05");
}

#[test]
fn test_parse_clip_instant_treats_fields_as_local() {
    let key = "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_05.ts";
    // 03:04:05 IST == 21:34:05 UTC on the previous day.
    assert_eq!(parse_clip_instant(key, IST), Some(utc(2025, 1, 1, 21, 34, 5)));
    assert_eq!(parse_clip_instant(key, 0), Some(utc(2025, 1, 2, 3, 4, 5)));
}

#[test]
fn test_parse_clip_instant_rejects_malformed_keys() {
    let bad = [
        "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_05",
        "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_05.mp4",
        "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_5.ts",
        "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_xx.ts",
        "cam1/2025/01/02/03/cam_12_2025_01_02_03_04_05.ts",
        "cam1/2025/01/02/03/cam_1_2025_13_02_03_04_05.ts",
        "cam1/2025/01/02/03/cam_1_2025_02_30_03_04_05.ts",
        "cam1/2025/01/02/03/cam_1_2025_01_02_24_04_05.ts",
        "cam1/2025/01/02/03/img_1_2025_01_02_03_04_05.ts",
        "cam1/2025/01/02/03/cam_1_2025_01_02_03_04_05_06.ts",
        "cam_1_2025_01_02_03_04_05.ts",
        "",
    ];
    for key in bad {
        assert_eq!(parse_clip_instant(key, IST), None, "{key:?} should not parse");
    }
}

#[test]
fn test_parse_start_text_forms() {
    let expected = utc(2025, 10, 26, 3, 30, 0);
    assert_eq!(parse_start_text("2025-10-26T09:00:00+05:30", 0).unwrap(), expected);
    assert_eq!(parse_start_text("2025-10-26T03:30:00Z", IST).unwrap(), expected);
    assert_eq!(parse_start_text("1761449400000", 0).unwrap(), expected);
    // Naive text is read in the configured offset, never the host zone.
    assert_eq!(parse_start_text("2025-10-26 09:00:00", IST).unwrap(), expected);
    assert_eq!(parse_start_text("2025-10-26T09:00", IST).unwrap(), expected);
}

#[test]
fn test_parse_start_text_rejects_garbage() {
    for text in ["", "   ", "yesterday", "2025-13-01T00:00:00Z", "26/10/2025 09:00"] {
        let err = parse_start_text(text, IST).expect_err(text);
        assert!(err.is_invalid_input(), "{text:?}: {err}");
    }
}

#[test]
fn test_start_time_variants_resolve() {
    let expected = utc(2025, 10, 26, 3, 30, 0);
    assert_eq!(StartTime::Instant(expected).resolve(IST).unwrap(), expected);
    assert_eq!(StartTime::EpochMillis(1_761_449_400_000).resolve(IST).unwrap(), expected);
    assert_eq!(
        StartTime::Text("2025-10-26T09:00:00+05:30".into()).resolve(0).unwrap(),
        expected
    );
}

#[test]
fn test_camera_canonicalization_accepts_known_forms() {
    let inputs: [CameraInput; 6] = [
        1u32.into(),
        2u32.into(),
        "1".into(),
        "2".into(),
        "cam1".into(),
        "CAM2".into(),
    ];
    let got: Vec<String> = inputs
        .iter()
        .map(|i| CameraId::canonicalize(i).expect("valid camera").to_string())
        .collect();
    assert_eq!(got, ["cam1", "cam2", "cam1", "cam2", "cam1", "cam2"]);
}

#[test]
fn test_camera_canonicalization_rejects_everything_else() {
    let inputs: [CameraInput; 13] = [
        10u32.into(),
        " cam1 ".into(),
        "2\n".into(),
        " 1".into(),
        "cam 1".into(),
        "".into(),
        "cam".into(),
        "cam12".into(),
        "camera1".into(),
        "c1".into(),
        "x1".into(),
        "cam_1".into(),
        "١".into(),
    ];
    for input in inputs {
        let err = CameraId::canonicalize(&input).expect_err("should reject");
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains(&input.to_string()), "message carries raw value: {err}");
    }
}

#[test]
fn test_camera_from_str() {
    let cam: CameraId = "Cam3".parse().expect("parse");
    assert_eq!(cam.digit(), 3);
    assert_eq!(cam.as_folder(), "cam3");
}
