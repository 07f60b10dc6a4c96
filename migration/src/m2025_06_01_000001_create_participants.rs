//! Migration to create the participants table.
//!
//! Participants are registered by an external registration flow and later
//! bound to an identity-provider user id on first login. Each lookup key
//! (email, github_username, auth_user_id) carries a unique index.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::Email).text().null())
                    .col(ColumnDef::new(Participants::GithubUsername).text().null())
                    .col(ColumnDef::new(Participants::DisplayName).text().not_null())
                    .col(ColumnDef::new(Participants::AvatarUrl).text().null())
                    .col(ColumnDef::new(Participants::Role).text().null())
                    .col(ColumnDef::new(Participants::Team).text().null())
                    .col(ColumnDef::new(Participants::Stream).text().null())
                    .col(ColumnDef::new(Participants::Status).text().null())
                    .col(
                        ColumnDef::new(Participants::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Participants::IsMentor).boolean().null())
                    .col(ColumnDef::new(Participants::AuthUserId).text().null())
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Participants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_email")
                    .table(Participants::Table)
                    .col(Participants::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_github_username")
                    .table(Participants::Table)
                    .col(Participants::GithubUsername)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_auth_user_id")
                    .table(Participants::Table)
                    .col(Participants::AuthUserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    Email,
    GithubUsername,
    DisplayName,
    AvatarUrl,
    Role,
    Team,
    Stream,
    Status,
    IsAdmin,
    IsMentor,
    AuthUserId,
    CreatedAt,
    UpdatedAt,
}
