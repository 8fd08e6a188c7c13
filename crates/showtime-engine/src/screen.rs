//! Showtime management screen state.
//!
//! [`ShowtimeScreen`] owns the fetched catalog, the candidate form, and the last
//! status message. Every successful mutation refreshes the showtime list in full
//! from the collection; a failed one only records an error message.
//!
//! Refreshes are sequenced with [`RefreshToken`]s so a caller with requests in
//! flight can drop a response that a newer refresh has superseded.

use tracing::{info, warn};

use crate::collection::{CollectionError, MovieSource, RoomSource, ShowtimeCollection};
use crate::conflict::Conflict;
use crate::endtime::MidnightPolicy;
use crate::form::{BlockReason, Gate, SaveAction, ShowtimeForm};
use crate::model::{Catalog, MovieId, Showtime, ShowtimeId};
use crate::time::WallTime;

/// Generation number of a showtime list refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

/// Last user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Success(String),
    Error(String),
}

/// Result of [`ShowtimeScreen::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(Showtime),
    Blocked(Vec<BlockReason>),
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ShowtimeScreen {
    catalog: Catalog,
    form: ShowtimeForm,
    status: Status,
    policy: MidnightPolicy,
    generation: u64,
}

impl ShowtimeScreen {
    pub fn new(policy: MidnightPolicy) -> Self {
        Self {
            form: ShowtimeForm::new().with_policy(policy),
            policy,
            ..Self::default()
        }
    }

    /// A screen over an already fetched catalog.
    pub fn with_catalog(catalog: Catalog, policy: MidnightPolicy) -> Self {
        Self {
            catalog,
            ..Self::new(policy)
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn form(&self) -> &ShowtimeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ShowtimeForm {
        &mut self.form
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn clear_status(&mut self) {
        self.status = Status::Idle;
    }

    /// Fetch movies, rooms, and showtimes.
    ///
    /// Each collection is fetched even if an earlier one failed; the first error is
    /// returned and the last one is left in the status.
    pub fn load(
        &mut self,
        movies: &impl MovieSource,
        rooms: &impl RoomSource,
        showtimes: &impl ShowtimeCollection,
    ) -> Result<(), CollectionError> {
        let mut first_error = None;

        match movies.movies() {
            Ok(list) => self.catalog.movies = list,
            Err(e) => {
                self.fail(format!("Failed to load movies: {}", e));
                first_error.get_or_insert(e);
            }
        }
        match rooms.rooms() {
            Ok(list) => self.catalog.rooms = list,
            Err(e) => {
                self.fail(format!("Failed to load rooms: {}", e));
                first_error.get_or_insert(e);
            }
        }
        if let Err(e) = self.refresh(showtimes) {
            first_error.get_or_insert(e);
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Start a showtime list refresh. Any token issued earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.generation += 1;
        RefreshToken(self.generation)
    }

    /// Install a fetched showtime list if `token` is still the newest refresh.
    ///
    /// Returns `false` and leaves the list untouched for a stale token.
    pub fn apply_refresh(&mut self, token: RefreshToken, showtimes: Vec<Showtime>) -> bool {
        if token.0 != self.generation {
            warn!(
                token = token.0,
                latest = self.generation,
                "dropping stale showtime refresh"
            );
            return false;
        }
        self.catalog.showtimes = showtimes;
        true
    }

    /// Refetch the full showtime list.
    pub fn refresh(&mut self, collection: &impl ShowtimeCollection) -> Result<(), CollectionError> {
        let token = self.begin_refresh();
        match collection.list() {
            Ok(list) => {
                self.apply_refresh(token, list);
                Ok(())
            }
            Err(e) => {
                self.fail(format!("Failed to load showtimes: {}", e));
                Err(e)
            }
        }
    }

    /// Open an empty form in create mode.
    pub fn open_create(&mut self) {
        self.form.reset();
    }

    /// Open the form on an existing showtime. Returns `false` for an unknown id.
    pub fn open_edit(&mut self, id: ShowtimeId) -> bool {
        match self.catalog.showtime(id) {
            Some(showtime) => {
                self.form = ShowtimeForm::edit(showtime).with_policy(self.policy);
                true
            }
            None => false,
        }
    }

    /// Discard the candidate.
    pub fn cancel(&mut self) {
        self.form.reset();
    }

    pub fn select_movie(&mut self, movie_id: Option<MovieId>) {
        self.form.set_movie(movie_id, &self.catalog.movies);
    }

    pub fn set_start_time(&mut self, start: Option<WallTime>) {
        self.form.set_start_time(start, &self.catalog.movies);
    }

    pub fn set_end_time(&mut self, end: Option<WallTime>) -> bool {
        self.form.set_end_time(end, &self.catalog.movies)
    }

    /// Conflicts of the current candidate against the last applied snapshot.
    pub fn conflicts(&self) -> Vec<Conflict> {
        self.form.conflicts(&self.catalog.showtimes)
    }

    pub fn has_conflict(&self) -> bool {
        !self.conflicts().is_empty()
    }

    pub fn gate(&self) -> Gate {
        self.form.evaluate(&self.catalog)
    }

    /// Submit the candidate through the gate.
    ///
    /// A blocked gate sends nothing. On success the form is reset and the list
    /// refetched. On failure only the status changes.
    pub fn save(&mut self, collection: &mut impl ShowtimeCollection) -> SaveOutcome {
        let (action, request) = match self.gate() {
            Gate::Ready { action, request } => (action, request),
            Gate::Blocked(reasons) => return SaveOutcome::Blocked(reasons),
        };

        let (result, done) = match action {
            SaveAction::Create => (collection.create(&request), "Showtime created"),
            SaveAction::Update(id) => (collection.update(id, &request), "Showtime updated"),
        };

        match result {
            Ok(saved) => {
                info!(id = %saved.id, room = %saved.room_id, date = %saved.date, "{}", done);
                self.status = Status::Success(done.to_string());
                self.form.reset();
                // A failed refetch records its own error; the save itself stands.
                let _ = self.refresh(&*collection);
                SaveOutcome::Saved(saved)
            }
            Err(e) => {
                let message = format!("Failed to save showtime: {}", e);
                self.fail(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }

    /// Delete a showtime, then refetch the list.
    pub fn delete(
        &mut self,
        id: ShowtimeId,
        collection: &mut impl ShowtimeCollection,
    ) -> Result<(), CollectionError> {
        match collection.delete(id) {
            Ok(()) => {
                info!(%id, "Showtime deleted");
                self.status = Status::Success("Showtime deleted".to_string());
                let _ = self.refresh(&*collection);
                Ok(())
            }
            Err(e) => {
                self.fail(format!("Failed to delete showtime: {}", e));
                Err(e)
            }
        }
    }

    fn fail(&mut self, message: String) {
        warn!("{}", message);
        self.status = Status::Error(message);
    }
}
