//! End-time derivation -- start time plus the selected movie's duration.
//!
//! Derivation never fails loudly. An unknown movie, a missing or non-positive
//! duration, or a rejected midnight crossing all yield `None`, which callers read as
//! "cannot compute yet".

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Movie, MovieId};
use crate::time::WallTime;

/// What to do when start + duration passes 24:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MidnightPolicy {
    /// Wrap to the next day's wall-clock time and keep the showtime's date.
    /// The stored end then sorts before the start (known limitation).
    #[default]
    Wrap,
    /// Refuse to derive an end time past midnight.
    Reject,
}

/// A derived end time together with whether it wrapped past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedEndTime {
    pub end: WallTime,
    pub crosses_midnight: bool,
}

/// Compute `start + duration_minutes`, reporting a midnight crossing.
///
/// Returns `None` when the duration is zero or negative.
pub fn derive_end_time_detailed(start: WallTime, duration_minutes: i64) -> Option<DerivedEndTime> {
    if duration_minutes <= 0 {
        return None;
    }
    let minutes = u32::try_from(duration_minutes).ok()?;
    let (end, crosses_midnight) = start.add_minutes(minutes);
    Some(DerivedEndTime {
        end,
        crosses_midnight,
    })
}

/// Compute `start + duration_minutes` with [`MidnightPolicy::Wrap`].
///
/// `derive_end_time(14:00, 120)` is `16:00`; `derive_end_time(23:30, 90)` is `01:00`
/// on the same date.
pub fn derive_end_time(start: WallTime, duration_minutes: i64) -> Option<WallTime> {
    derive_end_time_with_policy(start, duration_minutes, MidnightPolicy::Wrap)
}

/// Compute `start + duration_minutes` under an explicit midnight policy.
pub fn derive_end_time_with_policy(
    start: WallTime,
    duration_minutes: i64,
    policy: MidnightPolicy,
) -> Option<WallTime> {
    let derived = derive_end_time_detailed(start, duration_minutes)?;
    if derived.crosses_midnight {
        match policy {
            MidnightPolicy::Wrap => {
                debug!(%start, duration_minutes, end = %derived.end, "end time wrapped past midnight");
            }
            MidnightPolicy::Reject => {
                debug!(%start, duration_minutes, "end time would pass midnight, rejected");
                return None;
            }
        }
    }
    Some(derived.end)
}

/// Derive the end time for `movie_id` starting at `start`, looking the movie's
/// duration up in `movies`.
pub fn end_time_for(
    start: WallTime,
    movie_id: MovieId,
    movies: &[Movie],
    policy: MidnightPolicy,
) -> Option<WallTime> {
    let Some(movie) = movies.iter().find(|m| m.id == movie_id) else {
        debug!(%movie_id, "cannot derive end time: unknown movie");
        return None;
    };
    let Some(duration) = movie.positive_duration() else {
        debug!(%movie_id, duration = ?movie.duration, "cannot derive end time: no usable duration");
        return None;
    };
    derive_end_time_with_policy(start, i64::from(duration), policy)
}
