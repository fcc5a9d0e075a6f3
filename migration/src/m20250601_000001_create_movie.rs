use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::Id))
                    .col(string(Movie::Title))
                    .col(string(Movie::Type))
                    .col(string(Movie::Director))
                    .col(string(Movie::Budget))
                    .col(string(Movie::Location))
                    .col(string(Movie::Duration))
                    .col(string(Movie::YearTime))
                    .col(string_null(Movie::ImageUrl))
                    .col(big_integer(Movie::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_created_at")
                    .table(Movie::Table)
                    .col(Movie::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    Id,
    Title,
    Type,
    Director,
    Budget,
    Location,
    Duration,
    YearTime,
    ImageUrl,
    CreatedAt,
}
