//! Unit tests for the session edit handlers.

use chrono::NaiveDate;
use runplanner::planner::editor::{SegmentEdit, SessionEditor, OVERFLOW_LABEL};
use runplanner::planner::time::{parse_time, TimeOfDay};
use runplanner::planner::types::{PlannerError, Segment, SegmentMode, TrainingSession};

const EPS: f64 = 1e-9;

fn create_test_editor() -> SessionEditor {
    let session = TrainingSession::new(
        "Test Run",
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        parse_time("07:00").unwrap(),
        vec![
            Segment::new("Start", 5.0),
            Segment::new("A", 10.0).with_split(10.0, 0.0),
            Segment::new("B", 8.0).with_split(4.0, 400.0),
        ],
    );
    SessionEditor::new(session)
}

#[test]
fn test_target_eph_edit_leaves_fixed_duration() {
    let mut editor = create_test_editor();

    editor
        .edit(1, SegmentEdit::EndTime("09:00".to_string()))
        .unwrap();
    assert_eq!(editor.segments()[1].custom_duration_mins(), Some(120.0));

    editor
        .edit(1, SegmentEdit::TargetEph("20".to_string()))
        .unwrap();
    let a = &editor.segments()[1];
    assert_eq!(a.custom_duration_mins(), None);
    assert_eq!(a.mode, SegmentMode::intensity(20.0));
    // 10 EP at 20 EPH
    assert!((a.target_time_hours - 0.5).abs() < EPS);

    editor
        .edit(1, SegmentEdit::TargetEph("5".to_string()))
        .unwrap();
    assert!((editor.segments()[1].target_time_hours - 2.0).abs() < EPS);
}

#[test]
fn test_end_time_edit_fixes_duration() {
    let mut editor = create_test_editor();
    // A runs 07:00-08:00, B starts at 08:00
    assert_eq!(editor.segments()[2].start_time.to_string(), "08:00");

    editor
        .edit(2, SegmentEdit::EndTime("08:45".to_string()))
        .unwrap();

    let b = &editor.segments()[2];
    assert_eq!(b.custom_duration_mins(), Some(45.0));
    assert_eq!(b.end_time.to_string(), "08:45");
    // the typed target survives, unreconciled
    assert_eq!(b.target_eph(), 8.0);
}

#[test]
fn test_end_time_edit_overnight() {
    let mut editor = create_test_editor();
    editor.set_global_start("23:30").unwrap();
    // A starts 23:30 and runs one hour
    assert_eq!(editor.segments()[1].end_time.to_string(), "00:30");

    editor
        .edit(1, SegmentEdit::EndTime("00:10".to_string()))
        .unwrap();
    assert_eq!(editor.segments()[1].custom_duration_mins(), Some(40.0));
    assert_eq!(editor.segments()[1].end_time.to_string(), "00:10");
}

#[test]
fn test_end_time_equal_to_start_clamps_to_one_minute() {
    let mut editor = create_test_editor();

    editor
        .edit(1, SegmentEdit::EndTime("07:00".to_string()))
        .unwrap();
    assert_eq!(editor.segments()[1].custom_duration_mins(), Some(1.0));
    assert_eq!(editor.segments()[1].end_time.to_string(), "07:01");
}

#[test]
fn test_invalid_end_time_leaves_segment_unchanged() {
    let mut editor = create_test_editor();
    let before = editor.segments().to_vec();

    let result = editor.edit(1, SegmentEdit::EndTime("late".to_string()));
    assert!(matches!(result, Err(PlannerError::InvalidTime(_))));
    assert_eq!(editor.segments(), before.as_slice());
}

#[test]
fn test_start_time_edit_moves_global_start() {
    let mut editor = create_test_editor();

    editor
        .edit(0, SegmentEdit::StartTime("06:30".to_string()))
        .unwrap();
    assert_eq!(editor.global_start(), TimeOfDay::new(6, 30).unwrap());
    assert_eq!(editor.segments()[0].start_time.to_string(), "06:30");
    assert_eq!(editor.segments()[1].end_time.to_string(), "07:30");

    let result = editor.edit(1, SegmentEdit::StartTime("06:00".to_string()));
    assert!(matches!(result, Err(PlannerError::StartTimeNotEditable(1))));
}

#[test]
fn test_numeric_input_coerced() {
    let mut editor = create_test_editor();

    editor
        .edit(1, SegmentEdit::DistanceKm("-3".to_string()))
        .unwrap();
    editor
        .edit(2, SegmentEdit::ElevationM("lots".to_string()))
        .unwrap();

    assert_eq!(editor.segments()[1].split_dist_km, 0.0);
    assert_eq!(editor.segments()[2].split_elev_m, 0.0);
    assert!((editor.segments()[2].ep - 4.0).abs() < EPS);
}

#[test]
fn test_edit_out_of_range() {
    let mut editor = create_test_editor();
    let result = editor.edit(9, SegmentEdit::Name("X".to_string()));
    assert!(matches!(result, Err(PlannerError::SegmentNotFound(9))));
}

#[test]
fn test_append_labels() {
    let session = TrainingSession::new(
        "Labels",
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        parse_time("07:00").unwrap(),
        vec![Segment::new("Start", 5.0)],
    );
    let mut editor = SessionEditor::new(session);

    editor.append();
    editor.append();
    assert_eq!(editor.segments()[1].name, "A");
    assert_eq!(editor.segments()[2].name, "B");

    editor
        .edit(2, SegmentEdit::Name("Z".to_string()))
        .unwrap();
    editor.append();
    assert_eq!(editor.segments()[3].name, OVERFLOW_LABEL);
}

#[test]
fn test_append_uses_default_target() {
    let mut editor = create_test_editor();
    let id = editor.append();

    let added = editor.segments().last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.name, "C");
    assert!(added.target_eph() > 0.0);
    assert_eq!(added.split_dist_km, 0.0);
    assert_eq!(added.start_time, editor.segments()[2].end_time);
}

#[test]
fn test_duplicate_inserts_after_source() {
    let mut editor = create_test_editor();
    editor
        .edit(1, SegmentEdit::EndTime("08:30".to_string()))
        .unwrap();

    let id = editor.duplicate(1).unwrap();
    let segments = editor.segments();

    assert_eq!(segments.len(), 4);
    assert_eq!(segments[2].id, id);
    assert_ne!(segments[2].id, segments[1].id);
    assert_eq!(segments[2].name, "A (copy)");
    assert_eq!(segments[2].mode, segments[1].mode);
    assert_eq!(segments[2].split_dist_km, segments[1].split_dist_km);
    assert_eq!(segments[2].start_time.to_string(), "08:30");
    assert_eq!(segments[2].end_time.to_string(), "10:00");
    assert_eq!(segments[3].name, "B");

    assert!(matches!(
        editor.duplicate(10),
        Err(PlannerError::SegmentNotFound(10))
    ));
}

#[test]
fn test_delete_recalculates() {
    let mut editor = create_test_editor();

    assert!(editor.delete(1).unwrap());
    let segments = editor.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].name, "B");
    assert_eq!(segments[1].start_time.to_string(), "07:00");
    assert!((segments[1].total_dist_km - 4.0).abs() < EPS);
}

#[test]
fn test_delete_refuses_last_segment() {
    let mut editor = create_test_editor();
    assert!(editor.delete(2).unwrap());
    assert!(editor.delete(1).unwrap());

    let before = editor.segments().to_vec();
    assert!(!editor.delete(0).unwrap());
    assert_eq!(editor.len(), 1);
    assert_eq!(editor.segments(), before.as_slice());

    assert!(matches!(
        editor.delete(3),
        Err(PlannerError::SegmentNotFound(3))
    ));
}
