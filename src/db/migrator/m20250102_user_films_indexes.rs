use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UNIQUE_MEMBERSHIP_INDEX: &str = "idx_user_films_user_film_unique";
const USER_ORDER_INDEX: &str = "idx_user_films_user_order";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A film may appear in a user's list at most once.
        manager
            .create_index(
                Index::create()
                    .name(UNIQUE_MEMBERSHIP_INDEX)
                    .table(UserFilms::Table)
                    .col(UserFilms::UserId)
                    .col(UserFilms::FilmId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USER_ORDER_INDEX)
                    .table(UserFilms::Table)
                    .col(UserFilms::UserId)
                    .col(UserFilms::Order)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(USER_ORDER_INDEX)
                    .table(UserFilms::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(UNIQUE_MEMBERSHIP_INDEX)
                    .table(UserFilms::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum UserFilms {
    Table,
    UserId,
    FilmId,
    Order,
}
