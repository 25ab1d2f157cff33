//! Domain service for a user's film list and the shared catalog.

use thiserror::Error;

use crate::domain::{MembershipId, UserId};
use crate::models::film::{AddOutcome, CatalogFilm, ListedFilm};

/// Domain errors for film list operations.
#[derive(Debug, Error)]
pub enum FilmError {
    #[error("Film list entry not found: {0}")]
    NotFound(MembershipId),

    #[error("Invalid film name: {0}")]
    InvalidName(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for FilmError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for the film list.
#[async_trait::async_trait]
pub trait FilmService: Send + Sync {
    /// The user's list in display order.
    async fn list_films(&self, user: UserId) -> Result<Vec<ListedFilm>, FilmError>;

    /// Appends a film to the user's list, creating the catalog entry if needed.
    /// Adding a film that is already listed is a successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FilmError::InvalidName`] for a blank name.
    async fn add_film(&self, user: UserId, name: &str) -> Result<AddOutcome, FilmError>;

    /// Removes one entry from the user's list and renumbers the rest.
    ///
    /// # Errors
    ///
    /// Returns [`FilmError::NotFound`] if the id is not one of the user's entries.
    async fn remove_film(&self, user: UserId, id: MembershipId) -> Result<(), FilmError>;

    /// Catalog films matching `query` (case-insensitive substring) that are not
    /// yet in the user's list.
    async fn search_films(&self, user: UserId, query: &str)
    -> Result<Vec<CatalogFilm>, FilmError>;

    /// Reorders the list to match `ids`.
    ///
    /// # Errors
    ///
    /// Returns [`FilmError::NotFound`] naming the first id that is not one of
    /// the user's entries; the list is left unchanged.
    async fn sort_films(&self, user: UserId, ids: &[MembershipId]) -> Result<(), FilmError>;

    /// Highest order in the user's list (0 when empty).
    async fn max_order(&self, user: UserId) -> Result<i32, FilmError>;
}
