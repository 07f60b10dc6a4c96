//! Migration to create the admin_grants table.
//!
//! Admin grants are an allow-list keyed by the identity-provider user id,
//! independent of the participants table. A grant can exist for users that
//! never registered as participants.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminGrants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminGrants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminGrants::UserId).text().not_null())
                    .col(
                        ColumnDef::new(AdminGrants::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdminGrants::CreatedAt)
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
                    .name("idx_admin_grants_user_id")
                    .table(AdminGrants::Table)
                    .col(AdminGrants::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminGrants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdminGrants {
    Table,
    Id,
    UserId,
    IsActive,
    CreatedAt,
}
