use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
    sea_query::{LikeExpr, OnConflict, Query},
};

use crate::domain::{FilmId, UserId};
use crate::entities::{films, prelude::*, user_films};
use crate::models::film::CatalogFilm;

pub struct FilmRepository {
    conn: DatabaseConnection,
}

impl FilmRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count(&self) -> Result<u64> {
        Films::find()
            .count(&self.conn)
            .await
            .context("Failed to count films")
    }

    /// Case-insensitive substring search over the catalog, skipping films the
    /// user already has in their list.
    pub async fn search_excluding_user(
        &self,
        user_id: UserId,
        query: &str,
    ) -> Result<Vec<CatalogFilm>> {
        let already_listed = Query::select()
            .column(user_films::Column::FilmId)
            .from(UserFilms)
            .and_where(user_films::Column::UserId.eq(user_id.value()))
            .to_owned();

        let pattern = format!("%{}%", escape_like(query));

        let rows = Films::find()
            .filter(films::Column::Name.like(LikeExpr::new(pattern).escape('\\')))
            .filter(films::Column::Id.not_in_subquery(already_listed))
            .order_by_asc(films::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to search films")?;

        Ok(rows
            .into_iter()
            .map(|film| CatalogFilm {
                id: FilmId::new(film.id),
                name: film.name,
            })
            .collect())
    }
}

/// Looks up a film by exact name, inserting it first if absent.
///
/// The insert is `ON CONFLICT(name) DO NOTHING`, so two concurrent adds of
/// the same name both end up with the single catalog row. The returned flag is
/// true when this call created the row.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, name: &str) -> Result<(films::Model, bool)> {
    let active = films::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    let inserted = Films::insert(active)
        .on_conflict(
            OnConflict::column(films::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .context("Failed to insert film")?;

    let film = find_by_name(db, name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Film '{name}' missing after get-or-create"))?;

    Ok((film, inserted > 0))
}

async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<films::Model>> {
    Films::find()
        .filter(films::Column::Name.eq(name))
        .one(db)
        .await
        .context("Failed to query film by name")
}

/// Escapes LIKE metacharacters so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_handles_wildcards() {
        assert_eq!(escape_like("mat"), "mat");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("c:\\"), "c:\\\\");
    }
}
