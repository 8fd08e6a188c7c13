//! Integration tests for the `showtime` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the binary against the
//! schedule fixture: end-time derivation, conflict checks, and the save/delete round
//! trip through the schedule file.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the read-only schedule fixture.
fn schedule_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schedule.json")
}

/// Helper: copy the fixture to a scratch file the test may modify.
fn scratch_schedule(name: &str) -> String {
    let path = format!("/tmp/showtime-test-{}-{}.json", name, std::process::id());
    std::fs::copy(schedule_path(), &path).expect("fixture must exist");
    path
}

fn showtime() -> Command {
    let mut cmd = Command::cargo_bin("showtime").unwrap();
    cmd.env_remove("SHOWTIME_DATA").env_remove("RUST_LOG");
    cmd
}

fn read_catalog(path: &str) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).expect("schedule file must exist");
    serde_json::from_str(&raw).expect("schedule file must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// end-time
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn end_time_adds_movie_duration() {
    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "1", "--start", "14:00"])
        .assert()
        .success()
        .stdout("16:00\n");
}

#[test]
fn end_time_wraps_past_midnight_by_default() {
    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "2", "--start", "23:30"])
        .assert()
        .success()
        .stdout("01:00\n")
        .stderr(predicate::str::contains("midnight"));
}

#[test]
fn end_time_reject_policy_fails_past_midnight() {
    showtime()
        .args([
            "--data",
            schedule_path(),
            "--midnight",
            "reject",
            "end-time",
            "--movie",
            "2",
            "--start",
            "23:30",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("passes midnight"));
}

#[test]
fn end_time_unknown_movie_or_missing_duration_fails() {
    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "99", "--start", "14:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown movie 99"));

    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "3", "--start", "14:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no duration"));
}

#[test]
fn end_time_handles_absurd_durations() {
    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "4", "--start", "23:59"])
        .assert()
        .success()
        .stdout("04:14\n");
}

#[test]
fn malformed_start_time_is_a_usage_error() {
    showtime()
        .args(["--data", schedule_path(), "end-time", "--movie", "1", "--start", "9:5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}

#[test]
fn data_file_comes_from_env() {
    Command::cargo_bin("showtime")
        .unwrap()
        .env("SHOWTIME_DATA", schedule_path())
        .args(["end-time", "--movie", "1", "--start", "08:15"])
        .assert()
        .success()
        .stdout("10:15\n");
}

#[test]
fn missing_data_file_fails() {
    showtime()
        .args(["--data", "/tmp/showtime-test-does-not-exist.json", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read schedule file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_overlap_exits_with_conflict() {
    // Existing room 1 10:00-12:00; candidate 11:00-13:00
    showtime()
        .args([
            "--data", schedule_path(), "check", "--movie", "1", "--room", "1", "--date",
            "2025-11-24", "--start", "11:00",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("conflict: showtime #1 10:00-12:00 (60 min overlap)"));
}

#[test]
fn check_adjacent_slot_is_free() {
    showtime()
        .args([
            "--data", schedule_path(), "check", "--movie", "1", "--room", "1", "--date",
            "2025-11-24", "--start", "12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: room 1 on 2025-11-24 is free 12:00-14:00"));
}

#[test]
fn check_other_room_is_free() {
    showtime()
        .args([
            "--data", schedule_path(), "check", "--movie", "1", "--room", "2", "--date",
            "2025-11-24", "--start", "10:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok"));
}

#[test]
fn check_with_explicit_end_and_no_movie() {
    showtime()
        .args([
            "--data", schedule_path(), "check", "--room", "1", "--date", "2025-11-24",
            "--start", "09:00", "--end", "10:30",
        ])
        .assert()
        .code(2);
}

#[test]
fn check_editing_ignores_itself() {
    showtime()
        .args(["--data", schedule_path(), "check", "--id", "1", "--start", "10:30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:30-12:30"));
}

#[test]
fn check_incomplete_candidate_is_not_checkable() {
    showtime()
        .args(["--data", schedule_path(), "check", "--room", "1", "--start", "11:00"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("not checkable: missing date, end time"));
}

// ─────────────────────────────────────────────────────────────────────────────
// save / delete / list
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn save_creates_and_persists() {
    let path = scratch_schedule("save-create");

    showtime()
        .args([
            "--data", &path, "save", "--movie", "2", "--room", "1", "--date", "2025-11-24",
            "--start", "12:00", "--description", "Matinee",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 2"))
        .stdout(predicate::str::contains("\"endTime\": \"13:30\""));

    let catalog = read_catalog(&path);
    let showtimes = catalog["showtimes"].as_array().unwrap();
    assert_eq!(showtimes.len(), 2);
    assert_eq!(showtimes[1]["description"], "Matinee");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn save_conflict_is_blocked_and_file_untouched() {
    let path = scratch_schedule("save-conflict");
    let before = std::fs::read_to_string(&path).unwrap();

    showtime()
        .args([
            "--data", &path, "save", "--movie", "1", "--room", "1", "--date", "2025-11-24",
            "--start", "09:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot save showtime"))
        .stderr(predicate::str::contains("overlaps 1 showtime(s)"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn save_incomplete_lists_missing_fields() {
    let path = scratch_schedule("save-incomplete");

    showtime()
        .args(["--data", &path, "save", "--movie", "1", "--start", "15:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("room is required"))
        .stderr(predicate::str::contains("date is required"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn save_with_id_updates_in_place() {
    let path = scratch_schedule("save-update");

    showtime()
        .args(["--data", &path, "save", "--id", "1", "--start", "13:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startTime\": \"13:00\""))
        .stdout(predicate::str::contains("\"endTime\": \"15:00\""));

    let catalog = read_catalog(&path);
    let showtimes = catalog["showtimes"].as_array().unwrap();
    assert_eq!(showtimes.len(), 1);
    assert_eq!(showtimes[0]["startTime"], "13:00");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn delete_then_list() {
    let path = scratch_schedule("delete");

    showtime()
        .args(["--data", &path, "delete", "--id", "1"])
        .assert()
        .success()
        .stdout("deleted showtime #1\n");

    showtime()
        .args(["--data", &path, "list"])
        .assert()
        .success()
        .stdout("[]\n");

    showtime()
        .args(["--data", &path, "delete", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Showtime not found with id: 1"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn list_prints_showtimes_json() {
    showtime()
        .args(["--data", schedule_path(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"roomId\": 1"))
        .stdout(predicate::str::contains("Morning show"));
}
