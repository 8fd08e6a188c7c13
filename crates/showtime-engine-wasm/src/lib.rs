//! WASM bindings for showtime-engine.
//!
//! Exposes end-time derivation and conflict detection to the admin dashboard's
//! JavaScript via `wasm-bindgen`. Collections are passed as JSON strings in the
//! backend's own shape (`movieId`, `startTime`, ...).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p showtime-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/showtime-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/showtime_engine_wasm.wasm
//! ```

use serde::de::{self, Deserializer};
use serde::Deserialize;
use showtime_engine::{
    end_time_for, find_conflicts, parse_date, CheckableCandidate, MidnightPolicy, Movie, MovieId,
    RoomId, ScheduleError, Showtime, ShowtimeId, WallTime,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Input DTOs
// ---------------------------------------------------------------------------

/// Candidate form state as JavaScript holds it. Empty strings count as unset.
///
/// Ids may arrive as numbers or as `<select>` values (`""`, `"3"`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidateInput {
    #[serde(default, alias = "showtimeID", deserialize_with = "loose_id")]
    id: Option<i64>,
    #[serde(default, deserialize_with = "loose_id")]
    room_id: Option<i64>,
    #[serde(default, alias = "showtimeDate")]
    date: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
}

impl CandidateInput {
    /// The checkable candidate, `None` while any of room, date, start, end is unset.
    fn checkable(&self) -> Result<Option<CheckableCandidate>, ScheduleError> {
        let (Some(room_id), Some(date), Some(start), Some(end)) = (
            self.room_id,
            filled(&self.date),
            filled(&self.start_time),
            filled(&self.end_time),
        ) else {
            return Ok(None);
        };

        Ok(Some(CheckableCandidate {
            id: self.id.map(ShowtimeId),
            room_id: RoomId(room_id),
            date: parse_date(date)?,
            start: WallTime::parse(start)?,
            end: WallTime::parse(end)?,
        }))
    }
}

/// Accept an id as a JSON number, a numeric string, an empty string, or null.
fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid id '{}'", text)))
        }
    }
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_policy(policy: Option<String>) -> Result<MidnightPolicy, JsValue> {
    match policy.as_deref() {
        None | Some("") | Some("wrap") => Ok(MidnightPolicy::Wrap),
        Some("reject") => Ok(MidnightPolicy::Reject),
        Some(other) => Err(JsValue::from_str(&format!(
            "Unknown midnight policy '{}': expected wrap or reject",
            other
        ))),
    }
}

fn parse_candidate(json: &str) -> Result<Option<CheckableCandidate>, JsValue> {
    let input: CandidateInput = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid candidate JSON: {}", e)))?;
    input.checkable().map_err(js_err)
}

fn parse_showtimes(json: &str) -> Result<Vec<Showtime>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid showtimes JSON: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Derive the end time for a movie starting at `start_time`.
///
/// Returns `"HH:MM"`, or an empty string when it cannot be computed yet (no start
/// time, unknown movie, missing duration, or a midnight crossing under `"reject"`).
///
/// # Arguments
/// - `start_time` -- `"HH:MM"` from the time input
/// - `movie_id` -- the selected movie
/// - `movies_json` -- JSON array of `{id, title, genre, duration}`
/// - `policy` -- `"wrap"` (default) or `"reject"`
#[wasm_bindgen(js_name = "deriveEndTime")]
pub fn derive_end_time(
    start_time: &str,
    movie_id: i64,
    movies_json: &str,
    policy: Option<String>,
) -> Result<String, JsValue> {
    let policy = parse_policy(policy)?;
    let movies: Vec<Movie> = serde_json::from_str(movies_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid movies JSON: {}", e)))?;

    let Ok(start) = WallTime::parse(start_time.trim()) else {
        return Ok(String::new());
    };

    Ok(end_time_for(start, MovieId(movie_id), &movies, policy)
        .map(|end| end.to_string())
        .unwrap_or_default())
}

/// Whether the candidate overlaps a showtime in the same room on the same date.
///
/// An incomplete candidate never conflicts.
#[wasm_bindgen(js_name = "hasConflict")]
pub fn has_conflict(candidate_json: &str, showtimes_json: &str) -> Result<bool, JsValue> {
    let showtimes = parse_showtimes(showtimes_json)?;
    Ok(parse_candidate(candidate_json)?
        .map(|candidate| showtime_engine::has_conflict(&candidate, &showtimes))
        .unwrap_or(false))
}

/// The showtimes the candidate overlaps.
///
/// Returns a JSON array of `{existing, overlapMinutes}` objects.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts_json(candidate_json: &str, showtimes_json: &str) -> Result<String, JsValue> {
    let showtimes = parse_showtimes(showtimes_json)?;
    let conflicts = parse_candidate(candidate_json)?
        .map(|candidate| find_conflicts(&candidate, &showtimes))
        .unwrap_or_default();

    serde_json::to_string(&conflicts)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
