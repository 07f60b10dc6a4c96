//! Migration to create the tables that hang off a participant.
//!
//! These relations are owned by other parts of the dashboard (submissions,
//! reviews, scoring). The gating service only touches them during account
//! deletion, which removes dependents before the participant row itself, so
//! the full column sets live elsewhere; here we only establish the tables
//! and their participant reference columns.

use sea_orm_migration::prelude::*;

/// Dependent tables and the column referencing the participant, in the order
/// account deletion clears them.
pub const DEPENDENT_TABLES: &[(&str, &str)] = &[
    ("submissions", "participant_id"),
    ("peer_reviews", "reviewer_id"),
    ("participant_achievements", "participant_id"),
    ("leaderboard", "participant_id"),
    ("participant_mastery", "participant_id"),
    ("task_force_members", "participant_id"),
    ("participant_recognitions", "participant_id"),
    ("activity_log", "participant_id"),
    ("comments", "author_id"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, participant_column) in DEPENDENT_TABLES {
            manager
                .create_table(
                    Table::create()
                        .table(Alias::new(*table))
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Alias::new("id"))
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Alias::new(*participant_column))
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Alias::new("created_at"))
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
                        .name(format!("idx_{}_{}", table, participant_column))
                        .table(Alias::new(*table))
                        .col(Alias::new(*participant_column))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, _) in DEPENDENT_TABLES.iter().rev() {
            manager
                .drop_table(Table::drop().table(Alias::new(*table)).to_owned())
                .await?;
        }

        Ok(())
    }
}
