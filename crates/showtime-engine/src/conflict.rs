//! Detect showtimes that overlap a candidate in the same room on the same date.
//!
//! Only showtimes sharing the candidate's room and date are compared, and a showtime
//! being edited is never compared with itself. Intervals are half-open: a showing that
//! starts exactly when another ends is NOT a conflict.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{RoomId, Showtime, ShowtimeId};
use crate::time::WallTime;

/// A candidate with every field the detector needs.
///
/// Built by the form only once room, date, start, and end are all filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckableCandidate {
    /// Set when editing an existing showtime.
    pub id: Option<ShowtimeId>,
    pub room_id: RoomId,
    pub date: NaiveDate,
    pub start: WallTime,
    pub end: WallTime,
}

/// An existing showtime that the candidate overlaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub existing: Showtime,
    pub overlap_minutes: i64,
}

/// Whether `[start, end)` overlaps `[other_start, other_end)`.
///
/// The test is spelled as three boundary cases: the candidate starts inside the
/// other interval, ends inside it, or contains it. For intervals with `start < end`
/// this is exactly `start < other_end && other_start < end`.
pub fn overlaps(start: WallTime, end: WallTime, other_start: WallTime, other_end: WallTime) -> bool {
    let starts_inside = other_start <= start && start < other_end;
    let ends_inside = other_start < end && end <= other_end;
    let contains = start <= other_start && end >= other_end;
    starts_inside || ends_inside || contains
}

fn clashes(candidate: &CheckableCandidate, existing: &Showtime) -> bool {
    existing.room_id == candidate.room_id
        && existing.date == candidate.date
        && Some(existing.id) != candidate.id
        && overlaps(
            candidate.start,
            candidate.end,
            existing.start_time,
            existing.end_time,
        )
}

/// Find every existing showtime the candidate overlaps, in list order.
///
/// The overlap duration is `min(end) - max(start)`, floored at zero (a wrapped
/// end time can make it negative).
pub fn find_conflicts(candidate: &CheckableCandidate, existing: &[Showtime]) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|st| clashes(candidate, st))
        .map(|st| {
            let overlap_start = candidate.start.max(st.start_time);
            let overlap_end = candidate.end.min(st.end_time);
            let overlap_minutes =
                (i64::from(overlap_end.minutes()) - i64::from(overlap_start.minutes())).max(0);
            Conflict {
                existing: st.clone(),
                overlap_minutes,
            }
        })
        .collect()
}

/// Whether the candidate overlaps any existing showtime.
pub fn has_conflict(candidate: &CheckableCandidate, existing: &[Showtime]) -> bool {
    existing.iter().any(|st| clashes(candidate, st))
}
