//! `SeaORM` implementation of the `FilmService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::domain::{MembershipId, UserId};
use crate::models::film::{AddOutcome, CatalogFilm, ListedFilm};
use crate::services::film_service::{FilmError, FilmService};
use crate::services::ordering::OrderingError;

pub const MAX_FILM_NAME_LENGTH: usize = 200;

pub struct SeaOrmFilmService {
    store: Store,
}

impl SeaOrmFilmService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn database(err: &anyhow::Error) -> FilmError {
    FilmError::Database(format!("{err:#}"))
}

#[async_trait]
impl FilmService for SeaOrmFilmService {
    async fn list_films(&self, user: UserId) -> Result<Vec<ListedFilm>, FilmError> {
        self.store
            .list_user_films(user)
            .await
            .map_err(|e| database(&e))
    }

    async fn add_film(&self, user: UserId, name: &str) -> Result<AddOutcome, FilmError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FilmError::InvalidName("Film name cannot be empty".to_string()));
        }
        if name.chars().count() > MAX_FILM_NAME_LENGTH {
            return Err(FilmError::InvalidName(format!(
                "Film name must be {MAX_FILM_NAME_LENGTH} characters or fewer"
            )));
        }

        self.store
            .add_user_film(user, name)
            .await
            .map_err(|e| database(&e))
    }

    async fn remove_film(&self, user: UserId, id: MembershipId) -> Result<(), FilmError> {
        let removed = self
            .store
            .remove_user_film(user, id)
            .await
            .map_err(|e| database(&e))?;

        if removed {
            Ok(())
        } else {
            Err(FilmError::NotFound(id))
        }
    }

    async fn search_films(
        &self,
        user: UserId,
        query: &str,
    ) -> Result<Vec<CatalogFilm>, FilmError> {
        self.store
            .search_films(user, query)
            .await
            .map_err(|e| database(&e))
    }

    async fn sort_films(&self, user: UserId, ids: &[MembershipId]) -> Result<(), FilmError> {
        self.store
            .sort_user_films(user, ids)
            .await
            .map_err(|e| match e.downcast_ref::<OrderingError>() {
                Some(OrderingError::UnknownMembership(id)) => FilmError::NotFound(*id),
                None => database(&e),
            })
    }

    async fn max_order(&self, user: UserId) -> Result<i32, FilmError> {
        self.store
            .max_film_order(user)
            .await
            .map_err(|e| database(&e))
    }
}
