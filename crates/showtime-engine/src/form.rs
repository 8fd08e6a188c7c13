//! Candidate showtime form state and the submission gate.
//!
//! The form keeps the end time derived from the selected movie and start time:
//! changing either re-runs derivation and overwrites the end field. Saving is
//! allowed only when every required field is filled and the candidate does not
//! overlap another showtime in the same room and date.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conflict::{find_conflicts, CheckableCandidate, Conflict};
use crate::endtime::{end_time_for, MidnightPolicy};
use crate::model::{Catalog, Movie, MovieId, RoomId, Showtime, ShowtimeId};
use crate::time::WallTime;

/// A required form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Movie,
    Room,
    Date,
    StartTime,
    EndTime,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Movie => "movie",
            Field::Room => "room",
            Field::Date => "date",
            Field::StartTime => "start time",
            Field::EndTime => "end time",
        };
        f.write_str(name)
    }
}

/// Why the save action is disabled.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockReason {
    Missing(Field),
    /// A hand-entered end time at or before the start. Derived ends may wrap past
    /// midnight and are not checked.
    EndNotAfterStart { start: WallTime, end: WallTime },
    Conflict(Vec<Conflict>),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Missing(field) => write!(f, "{} is required", field),
            BlockReason::EndNotAfterStart { start, end } => {
                write!(f, "end time {} must be after start time {}", end, start)
            }
            BlockReason::Conflict(conflicts) => {
                write!(f, "overlaps {} showtime(s) in the same room:", conflicts.len())?;
                for c in conflicts {
                    write!(
                        f,
                        " #{} {}-{}",
                        c.existing.id, c.existing.start_time, c.existing.end_time
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Write payload for the showtime collection (create and update share it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowtimeRequest {
    pub movie_id: MovieId,
    pub room_id: RoomId,
    #[serde(alias = "showtimeDate")]
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default)]
    pub description: String,
}

impl ShowtimeRequest {
    /// The persisted record this request describes once it has an id.
    pub fn into_showtime(self, id: ShowtimeId) -> Showtime {
        Showtime {
            id,
            movie_id: self.movie_id,
            room_id: self.room_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
        }
    }
}

/// Whether a save creates a new showtime or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Create,
    Update(ShowtimeId),
}

/// Result of evaluating the submission gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Ready {
        action: SaveAction,
        request: ShowtimeRequest,
    },
    Blocked(Vec<BlockReason>),
}

impl Gate {
    pub fn is_ready(&self) -> bool {
        matches!(self, Gate::Ready { .. })
    }
}

/// The candidate showtime being created or edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowtimeForm {
    id: Option<ShowtimeId>,
    movie_id: Option<MovieId>,
    room_id: Option<RoomId>,
    date: Option<NaiveDate>,
    start: Option<WallTime>,
    end: Option<WallTime>,
    description: String,
    policy: MidnightPolicy,
}

impl ShowtimeForm {
    /// An empty form in create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from a persisted showtime, in edit mode.
    ///
    /// The stored end time is kept as-is until the movie or start time changes.
    pub fn edit(showtime: &Showtime) -> Self {
        Self {
            id: Some(showtime.id),
            movie_id: Some(showtime.movie_id),
            room_id: Some(showtime.room_id),
            date: Some(showtime.date),
            start: Some(showtime.start_time),
            end: Some(showtime.end_time),
            description: showtime.description.clone(),
            policy: MidnightPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MidnightPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Clear every field and return to create mode. The midnight policy is kept.
    pub fn reset(&mut self) {
        *self = Self::new().with_policy(self.policy);
    }

    pub fn id(&self) -> Option<ShowtimeId> {
        self.id
    }

    pub fn movie_id(&self) -> Option<MovieId> {
        self.movie_id
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn start_time(&self) -> Option<WallTime> {
        self.start
    }

    pub fn end_time(&self) -> Option<WallTime> {
        self.end
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn policy(&self) -> MidnightPolicy {
        self.policy
    }

    pub fn action(&self) -> SaveAction {
        match self.id {
            Some(id) => SaveAction::Update(id),
            None => SaveAction::Create,
        }
    }

    /// Select a movie and re-derive the end time.
    pub fn set_movie(&mut self, movie_id: Option<MovieId>, movies: &[Movie]) {
        self.movie_id = movie_id;
        self.rederive(movies);
    }

    /// Set the start time and re-derive the end time.
    pub fn set_start_time(&mut self, start: Option<WallTime>, movies: &[Movie]) {
        self.start = start;
        self.rederive(movies);
    }

    /// Enter an end time by hand.
    ///
    /// Ignored while the selected movie has a usable duration, since the end time is
    /// derived then. Returns whether the value was taken.
    pub fn set_end_time(&mut self, end: Option<WallTime>, movies: &[Movie]) -> bool {
        if self.end_is_derived(movies) {
            debug!("end time is derived from the selected movie, manual entry ignored");
            return false;
        }
        self.end = end;
        true
    }

    pub fn set_room(&mut self, room_id: Option<RoomId>) {
        self.room_id = room_id;
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Whether the end field is currently read-only.
    pub fn end_is_derived(&self, movies: &[Movie]) -> bool {
        self.movie_id
            .and_then(|id| movies.iter().find(|m| m.id == id))
            .and_then(Movie::positive_duration)
            .is_some()
    }

    fn rederive(&mut self, movies: &[Movie]) {
        self.end = match (self.start, self.movie_id) {
            (Some(start), Some(movie_id)) => end_time_for(start, movie_id, movies, self.policy),
            _ => None,
        };
    }

    /// Required fields still empty, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        let checks = [
            (Field::Movie, self.movie_id.is_some()),
            (Field::Room, self.room_id.is_some()),
            (Field::Date, self.date.is_some()),
            (Field::StartTime, self.start.is_some()),
            (Field::EndTime, self.end.is_some()),
        ];
        checks
            .into_iter()
            .filter_map(|(field, present)| (!present).then_some(field))
            .collect()
    }

    /// The candidate as the conflict detector sees it, once room, date, start,
    /// and end are all present.
    pub fn checkable(&self) -> Option<CheckableCandidate> {
        Some(CheckableCandidate {
            id: self.id,
            room_id: self.room_id?,
            date: self.date?,
            start: self.start?,
            end: self.end?,
        })
    }

    /// Conflicts against `showtimes`; empty while the candidate is not checkable.
    pub fn conflicts(&self, showtimes: &[Showtime]) -> Vec<Conflict> {
        self.checkable()
            .map(|candidate| find_conflicts(&candidate, showtimes))
            .unwrap_or_default()
    }

    /// Decide whether the form may be submitted against the current snapshot.
    pub fn evaluate(&self, catalog: &Catalog) -> Gate {
        let mut reasons: Vec<BlockReason> = self
            .missing_fields()
            .into_iter()
            .map(BlockReason::Missing)
            .collect();

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end <= start && !self.end_is_derived(&catalog.movies) {
                reasons.push(BlockReason::EndNotAfterStart { start, end });
            }
        }

        let conflicts = self.conflicts(&catalog.showtimes);
        if !conflicts.is_empty() {
            reasons.push(BlockReason::Conflict(conflicts));
        }

        let request = match (self.movie_id, self.room_id, self.date, self.start, self.end) {
            (Some(movie_id), Some(room_id), Some(date), Some(start_time), Some(end_time))
                if reasons.is_empty() =>
            {
                ShowtimeRequest {
                    movie_id,
                    room_id,
                    date,
                    start_time,
                    end_time,
                    description: self.description.clone(),
                }
            }
            _ => {
                debug!(blocked = reasons.len(), "showtime form not submittable");
                return Gate::Blocked(reasons);
            }
        };

        debug!(action = ?self.action(), "showtime form ready to submit");
        Gate::Ready {
            action: self.action(),
            request,
        }
    }
}
