use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info};

use super::film;
use crate::domain::{FilmId, MembershipId, UserId};
use crate::entities::{prelude::*, user_films};
use crate::models::film::{AddOutcome, ListedFilm};
use crate::services::ordering::{self, FIRST_ORDER};

pub struct MembershipRepository {
    conn: DatabaseConnection,
}

impl MembershipRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// The user's list joined with film names, in display order.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<ListedFilm>> {
        let rows = UserFilms::find()
            .filter(user_films::Column::UserId.eq(user_id.value()))
            .order_by_asc(user_films::Column::Order)
            .order_by_asc(user_films::Column::Id)
            .find_also_related(Films)
            .all(&self.conn)
            .await
            .context("Failed to list films for user")?;

        Ok(rows
            .into_iter()
            .filter_map(|(membership, film)| {
                film.map(|film| ListedFilm {
                    id: MembershipId::new(membership.id),
                    film_id: FilmId::new(film.id),
                    name: film.name,
                    order: membership.order,
                })
            })
            .collect())
    }

    /// Adds a film (by name) to the end of the user's list.
    pub async fn add_for_user(&self, user_id: UserId, name: &str) -> Result<AddOutcome> {
        let txn = self.conn.begin().await?;

        let (film, created_film) = film::get_or_create(&txn, name).await?;
        let order = ordering::next_order(max_order(&txn, user_id).await?);

        let active = user_films::ActiveModel {
            user_id: Set(user_id.value()),
            film_id: Set(film.id),
            order: Set(order),
            ..Default::default()
        };

        let inserted = UserFilms::insert(active)
            .on_conflict(
                OnConflict::columns([user_films::Column::UserId, user_films::Column::FilmId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .context("Failed to insert membership")?;

        txn.commit().await?;

        if inserted == 0 {
            debug!("Film '{}' already listed for user {}", name, user_id);
            return Ok(AddOutcome::AlreadyListed);
        }

        info!(
            "Added film '{}' for user {} at position {}",
            name, user_id, order
        );
        Ok(AddOutcome::Added { created_film })
    }

    /// Deletes one of the user's memberships and closes the gap it leaves.
    /// Returns false when the id is not one of the user's memberships.
    pub async fn remove_for_user(&self, user_id: UserId, id: MembershipId) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let result = UserFilms::delete_many()
            .filter(user_films::Column::Id.eq(id.value()))
            .filter(user_films::Column::UserId.eq(user_id.value()))
            .exec(&txn)
            .await
            .context("Failed to delete membership")?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        reorder(&txn, user_id).await?;
        txn.commit().await?;

        info!("Removed membership {} for user {}", id, user_id);
        Ok(true)
    }

    /// Applies a client-submitted ordering.
    ///
    /// Fails with [`ordering::OrderingError`] (inside the `anyhow` error) when
    /// an id does not belong to the user; nothing is written in that case.
    pub async fn sort_for_user(&self, user_id: UserId, requested: &[MembershipId]) -> Result<()> {
        let txn = self.conn.begin().await?;

        lock_list(&txn, user_id).await?;
        let current = current_orders(&txn, user_id).await?;
        let plan = ordering::plan_sort(&current, requested)?;
        apply_orders(&txn, &plan).await?;

        txn.commit().await?;

        debug!(
            "Sorted list for user {}: {} positions changed",
            user_id,
            plan.len()
        );
        Ok(())
    }

    pub async fn max_order(&self, user_id: UserId) -> Result<i32> {
        max_order(&self.conn, user_id).await
    }

    pub async fn reorder(&self, user_id: UserId) -> Result<()> {
        reorder(&self.conn, user_id).await
    }
}

/// Highest order in the user's list, or `FIRST_ORDER - 1` for an empty list.
pub async fn max_order<C: ConnectionTrait>(db: &C, user_id: UserId) -> Result<i32> {
    let max: Option<Option<i32>> = UserFilms::find()
        .select_only()
        .column_as(user_films::Column::Order.max(), "max_order")
        .filter(user_films::Column::UserId.eq(user_id.value()))
        .into_tuple()
        .one(db)
        .await
        .context("Failed to query max order")?;

    Ok(max.flatten().unwrap_or(FIRST_ORDER - 1))
}

/// Renumbers the user's list to `1..=N` in its current relative order.
pub async fn reorder<C: ConnectionTrait>(db: &C, user_id: UserId) -> Result<()> {
    let current = current_orders(db, user_id).await?;
    let plan = ordering::plan_renumber(&current);
    apply_orders(db, &plan).await
}

/// Takes SQLite's write lock before the first read. A transaction that reads
/// first gets `SQLITE_BUSY` on upgrade instead of waiting for other writers.
async fn lock_list<C: ConnectionTrait>(db: &C, user_id: UserId) -> Result<()> {
    UserFilms::update_many()
        .col_expr(
            user_films::Column::Order,
            Expr::col(user_films::Column::Order).into(),
        )
        .filter(user_films::Column::UserId.eq(user_id.value()))
        .exec(db)
        .await
        .context("Failed to lock list for update")?;
    Ok(())
}

async fn current_orders<C: ConnectionTrait>(
    db: &C,
    user_id: UserId,
) -> Result<Vec<(MembershipId, i32)>> {
    let rows: Vec<(i32, i32)> = UserFilms::find()
        .select_only()
        .column(user_films::Column::Id)
        .column(user_films::Column::Order)
        .filter(user_films::Column::UserId.eq(user_id.value()))
        .order_by_asc(user_films::Column::Order)
        .order_by_asc(user_films::Column::Id)
        .into_tuple()
        .all(db)
        .await
        .context("Failed to load list order")?;

    Ok(rows
        .into_iter()
        .map(|(id, order)| (MembershipId::new(id), order))
        .collect())
}

async fn apply_orders<C: ConnectionTrait>(db: &C, plan: &[(MembershipId, i32)]) -> Result<()> {
    for &(id, order) in plan {
        UserFilms::update_many()
            .col_expr(user_films::Column::Order, Expr::value(order))
            .filter(user_films::Column::Id.eq(id.value()))
            .exec(db)
            .await
            .with_context(|| format!("Failed to update order of membership {id}"))?;
    }
    Ok(())
}
