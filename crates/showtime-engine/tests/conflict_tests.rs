//! Tests for same-room, same-date showtime overlap detection.

use chrono::NaiveDate;
use showtime_engine::conflict::{find_conflicts, has_conflict, overlaps, CheckableCandidate};
use showtime_engine::model::{MovieId, RoomId, Showtime, ShowtimeId};
use showtime_engine::time::WallTime;

fn t(s: &str) -> WallTime {
    WallTime::parse(s).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, d).unwrap()
}

/// Helper to create a persisted showtime in `room` on 2025-11-`d`.
fn showtime(id: i64, room: i64, d: u32, start: &str, end: &str) -> Showtime {
    Showtime {
        id: ShowtimeId(id),
        movie_id: MovieId(1),
        room_id: RoomId(room),
        date: day(d),
        start_time: t(start),
        end_time: t(end),
        description: String::new(),
    }
}

fn candidate(room: i64, d: u32, start: &str, end: &str) -> CheckableCandidate {
    CheckableCandidate {
        id: None,
        room_id: RoomId(room),
        date: day(d),
        start: t(start),
        end: t(end),
    }
}

#[test]
fn overlapping_showtime_in_same_room_conflicts() {
    // Existing R1 10:00-12:00, candidate 11:00-13:00 -> 60-min overlap
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    let c = candidate(1, 24, "11:00", "13:00");

    assert!(has_conflict(&c, &existing));
    let conflicts = find_conflicts(&c, &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].existing.id, ShowtimeId(1));
    assert_eq!(conflicts[0].overlap_minutes, 60);
}

#[test]
fn starting_when_another_ends_is_not_a_conflict() {
    // Existing 10:00-12:00, candidate 12:00-14:00 -> adjacent
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    assert!(!has_conflict(&candidate(1, 24, "12:00", "14:00"), &existing));
    // And the other way round: candidate ends exactly when the existing one starts.
    assert!(!has_conflict(&candidate(1, 24, "08:00", "10:00"), &existing));
}

#[test]
fn different_room_never_conflicts() {
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    assert!(!has_conflict(&candidate(2, 24, "10:00", "12:00"), &existing));
}

#[test]
fn different_date_never_conflicts() {
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    assert!(!has_conflict(&candidate(1, 25, "10:00", "12:00"), &existing));
}

#[test]
fn editing_never_conflicts_with_itself() {
    let existing = vec![showtime(7, 1, 24, "10:00", "12:00")];
    let mut c = candidate(1, 24, "10:30", "12:30");
    c.id = Some(ShowtimeId(7));
    assert!(!has_conflict(&c, &existing));

    // But it still conflicts with a different showtime it now overlaps.
    let existing = vec![
        showtime(7, 1, 24, "10:00", "12:00"),
        showtime(8, 1, 24, "12:00", "14:00"),
    ];
    let conflicts = find_conflicts(&c, &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].existing.id, ShowtimeId(8));
    assert_eq!(conflicts[0].overlap_minutes, 30);
}

#[test]
fn candidate_containing_existing_conflicts() {
    let existing = vec![showtime(1, 1, 24, "10:00", "11:00")];
    let conflicts = find_conflicts(&candidate(1, 24, "09:00", "12:00"), &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 60);
}

#[test]
fn candidate_inside_existing_conflicts() {
    let existing = vec![showtime(1, 1, 24, "09:00", "12:00")];
    assert!(has_conflict(&candidate(1, 24, "10:00", "11:00"), &existing));
}

#[test]
fn identical_interval_conflicts() {
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    let conflicts = find_conflicts(&candidate(1, 24, "10:00", "12:00"), &existing);
    assert_eq!(conflicts[0].overlap_minutes, 120);
}

#[test]
fn all_conflicts_reported_in_list_order() {
    let existing = vec![
        showtime(1, 1, 24, "09:00", "10:30"),
        showtime(2, 2, 24, "10:00", "11:00"),
        showtime(3, 1, 24, "11:30", "13:00"),
        showtime(4, 1, 24, "13:00", "15:00"),
    ];
    let conflicts = find_conflicts(&candidate(1, 24, "10:00", "12:00"), &existing);
    let ids: Vec<i64> = conflicts.iter().map(|c| c.existing.id.0).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(conflicts[0].overlap_minutes, 30);
    assert_eq!(conflicts[1].overlap_minutes, 30);
}

#[test]
fn empty_list_never_conflicts() {
    assert!(!has_conflict(&candidate(1, 24, "10:00", "12:00"), &[]));
    assert!(find_conflicts(&candidate(1, 24, "10:00", "12:00"), &[]).is_empty());
}

#[test]
fn wrapped_late_showing_still_blocks_its_start_slot() {
    // 23:30 + 90 min is stored as 23:30-01:00. Its start still falls inside a
    // 23:00-23:59 showing, so the boundary-case test reports it.
    let existing = vec![showtime(1, 1, 24, "23:00", "23:59")];
    let c = candidate(1, 24, "23:30", "01:00");
    let conflicts = find_conflicts(&c, &existing);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].overlap_minutes, 0, "wrapped overlap floors at zero");
}

#[test]
fn overlaps_predicate_boundaries() {
    assert!(overlaps(t("10:00"), t("11:00"), t("10:59"), t("12:00")));
    assert!(!overlaps(t("10:00"), t("11:00"), t("11:00"), t("12:00")));
    assert!(!overlaps(t("11:00"), t("12:00"), t("10:00"), t("11:00")));
    assert!(overlaps(t("10:00"), t("12:00"), t("10:00"), t("12:00")));
}

#[test]
fn detector_does_not_touch_the_list() {
    let existing = vec![showtime(1, 1, 24, "10:00", "12:00")];
    let before = existing.clone();
    let _ = find_conflicts(&candidate(1, 24, "11:00", "13:00"), &existing);
    assert_eq!(existing, before);
}
