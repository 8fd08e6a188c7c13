//! # showtime-engine
//!
//! Showtime scheduling for a cinema admin dashboard: derive a showtime's end time
//! from the movie's duration, and detect showtimes that overlap in the same room on
//! the same date.
//!
//! The validator works on data the caller has already fetched and performs no I/O.
//! Times are wall-clock minutes since midnight, never compared as strings.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use showtime_engine::{derive_end_time, has_conflict, CheckableCandidate, RoomId, WallTime};
//!
//! let start = WallTime::parse("14:00").unwrap();
//! assert_eq!(derive_end_time(start, 120).unwrap().to_string(), "16:00");
//!
//! let candidate = CheckableCandidate {
//!     id: None,
//!     room_id: RoomId(1),
//!     date: NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(),
//!     start,
//!     end: WallTime::parse("16:00").unwrap(),
//! };
//! assert!(!has_conflict(&candidate, &[]));
//! ```
//!
//! ## Modules
//!
//! - [`time`] — `WallTime` (HH:MM) and calendar date parsing
//! - [`model`] — Movies, rooms, showtimes, and the `Catalog` snapshot
//! - [`endtime`] — Start time + duration → end time, with a midnight policy
//! - [`conflict`] — Same-room, same-date overlap detection
//! - [`form`] — Candidate form state and the submission gate
//! - [`collection`] — Movie/room/showtime collaborators and an in-memory store
//! - [`screen`] — Screen state: load, save, delete, sequenced refreshes
//! - [`error`] — Error types

pub mod collection;
pub mod conflict;
pub mod endtime;
pub mod error;
pub mod form;
pub mod model;
pub mod screen;
pub mod time;

pub use collection::{
    CollectionError, ErrorPayload, MemoryCollection, MovieSource, RoomSource, ShowtimeCollection,
};
pub use conflict::{find_conflicts, has_conflict, overlaps, CheckableCandidate, Conflict};
pub use endtime::{
    derive_end_time, derive_end_time_detailed, derive_end_time_with_policy, end_time_for,
    DerivedEndTime, MidnightPolicy,
};
pub use error::ScheduleError;
pub use form::{BlockReason, Field, Gate, SaveAction, ShowtimeForm, ShowtimeRequest};
pub use model::{Catalog, Movie, MovieId, Room, RoomId, Showtime, ShowtimeId};
pub use screen::{RefreshToken, SaveOutcome, ShowtimeScreen, Status};
pub use time::{parse_date, WallTime};
