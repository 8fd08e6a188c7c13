//! Movies, rooms, and showtimes as the dashboard's backend returns them.
//!
//! Field names follow the backend's JSON (`movieId`, `startTime`, ...). The backend's
//! older spellings (`showtimeID`, `showtimeDate`, `movieID`, `roomID`) are accepted as
//! aliases when reading.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::time::WallTime;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier of a movie in the movie collection.
    MovieId
);
id_type!(
    /// Identifier of a screening room. Conflicts are partitioned by room.
    RoomId
);
id_type!(
    /// Identifier of a persisted showtime.
    ShowtimeId
);

/// A movie. Read-only from the scheduler's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(alias = "movieID")]
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    /// Running time in minutes. The backend may omit it or send zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

impl Movie {
    /// The duration in minutes, only when present and positive.
    pub fn positive_duration(&self) -> Option<u32> {
        self.duration
            .filter(|d| *d > 0)
            .and_then(|d| u32::try_from(d).ok())
    }
}

/// A screening room. Only `id` matters to scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(alias = "roomID")]
    pub id: RoomId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_columns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
}

/// A persisted showtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    #[serde(alias = "showtimeID")]
    pub id: ShowtimeId,
    pub movie_id: MovieId,
    pub room_id: RoomId,
    #[serde(alias = "showtimeDate")]
    pub date: NaiveDate,
    pub start_time: WallTime,
    pub end_time: WallTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// The data a showtime screen works from: everything fetched from the three
/// collections, owned by the caller and lent to the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub showtimes: Vec<Showtime>,
}

impl Catalog {
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn showtime(&self, id: ShowtimeId) -> Option<&Showtime> {
        self.showtimes.iter().find(|s| s.id == id)
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
