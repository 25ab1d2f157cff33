use serde::Serialize;

use crate::domain::{FilmId, MembershipId};

/// One row of a user's list: the membership joined with its film name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedFilm {
    /// Membership id; this is what delete and sort requests carry.
    pub id: MembershipId,
    pub film_id: FilmId,
    pub name: String,
    pub order: i32,
}

/// A catalog film offered as a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogFilm {
    pub id: FilmId,
    pub name: String,
}

/// What an add request did to the user's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new membership was created at the end of the list.
    Added { created_film: bool },
    /// The film was already in the list; nothing changed.
    AlreadyListed,
}
