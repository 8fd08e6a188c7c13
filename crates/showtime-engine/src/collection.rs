//! Collaborators the showtime screen reads from and writes to.
//!
//! The movie and room collections are read-only. The showtime collection accepts
//! create (no id) and update (with id) requests of the same shape and answers with
//! the persisted record or an error payload `{message}`.
//!
//! [`MemoryCollection`] backs all three with an in-memory [`Catalog`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conflict::{has_conflict, CheckableCandidate};
use crate::form::ShowtimeRequest;
use crate::model::{Catalog, Movie, Room, Showtime, ShowtimeId};

/// Error body returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Errors from a collection request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    /// The backend refused the request and said why.
    #[error("{}", .0.message)]
    Rejected(ErrorPayload),

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl CollectionError {
    pub fn rejected(message: impl Into<String>) -> Self {
        CollectionError::Rejected(ErrorPayload {
            message: message.into(),
        })
    }
}

pub trait MovieSource {
    fn movies(&self) -> Result<Vec<Movie>, CollectionError>;
}

pub trait RoomSource {
    fn rooms(&self) -> Result<Vec<Room>, CollectionError>;
}

pub trait ShowtimeCollection {
    fn list(&self) -> Result<Vec<Showtime>, CollectionError>;

    fn create(&mut self, request: &ShowtimeRequest) -> Result<Showtime, CollectionError>;

    fn update(
        &mut self,
        id: ShowtimeId,
        request: &ShowtimeRequest,
    ) -> Result<Showtime, CollectionError>;

    fn delete(&mut self, id: ShowtimeId) -> Result<(), CollectionError>;
}

/// All three collections over one in-memory catalog.
///
/// New showtimes get `max(id) + 1`. Requests naming an unknown movie or room are
/// rejected. With [`MemoryCollection::enforce_conflicts`] the store also refuses
/// overlapping showtimes, acting as an authoritative backend would.
#[derive(Debug, Clone, Default)]
pub struct MemoryCollection {
    catalog: Catalog,
    enforce_conflicts: bool,
}

impl MemoryCollection {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            enforce_conflicts: false,
        }
    }

    pub fn enforce_conflicts(mut self, enforce: bool) -> Self {
        self.enforce_conflicts = enforce;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    fn next_id(&self) -> ShowtimeId {
        let max = self.catalog.showtimes.iter().map(|s| s.id.0).max().unwrap_or(0);
        ShowtimeId(max + 1)
    }

    fn validate(
        &self,
        id: Option<ShowtimeId>,
        request: &ShowtimeRequest,
    ) -> Result<(), CollectionError> {
        if self.catalog.movie(request.movie_id).is_none() {
            return Err(CollectionError::rejected(format!(
                "Movie not found with id: {}",
                request.movie_id
            )));
        }
        if self.catalog.room(request.room_id).is_none() {
            return Err(CollectionError::rejected(format!(
                "Room not found with id: {}",
                request.room_id
            )));
        }
        if self.enforce_conflicts {
            let candidate = CheckableCandidate {
                id,
                room_id: request.room_id,
                date: request.date,
                start: request.start_time,
                end: request.end_time,
            };
            if has_conflict(&candidate, &self.catalog.showtimes) {
                return Err(CollectionError::rejected(
                    "Showtime overlaps another showtime in the same room",
                ));
            }
        }
        Ok(())
    }
}

impl MovieSource for MemoryCollection {
    fn movies(&self) -> Result<Vec<Movie>, CollectionError> {
        Ok(self.catalog.movies.clone())
    }
}

impl RoomSource for MemoryCollection {
    fn rooms(&self) -> Result<Vec<Room>, CollectionError> {
        Ok(self.catalog.rooms.clone())
    }
}

impl ShowtimeCollection for MemoryCollection {
    fn list(&self) -> Result<Vec<Showtime>, CollectionError> {
        Ok(self.catalog.showtimes.clone())
    }

    fn create(&mut self, request: &ShowtimeRequest) -> Result<Showtime, CollectionError> {
        self.validate(None, request)?;
        let showtime = request.clone().into_showtime(self.next_id());
        self.catalog.showtimes.push(showtime.clone());
        Ok(showtime)
    }

    fn update(
        &mut self,
        id: ShowtimeId,
        request: &ShowtimeRequest,
    ) -> Result<Showtime, CollectionError> {
        self.validate(Some(id), request)?;
        let slot = self
            .catalog
            .showtimes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CollectionError::rejected(format!("Showtime not found with id: {}", id)))?;
        *slot = request.clone().into_showtime(id);
        Ok(slot.clone())
    }

    fn delete(&mut self, id: ShowtimeId) -> Result<(), CollectionError> {
        let before = self.catalog.showtimes.len();
        self.catalog.showtimes.retain(|s| s.id != id);
        if self.catalog.showtimes.len() == before {
            return Err(CollectionError::rejected(format!(
                "Showtime not found with id: {}",
                id
            )));
        }
        Ok(())
    }
}
