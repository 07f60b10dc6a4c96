//! Database migrations for the Academy API.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_01_000001_create_participants;
mod m2025_06_01_000002_create_admin_grants;
mod m2025_06_01_000003_create_participant_dependents;

pub use m2025_06_01_000003_create_participant_dependents::DEPENDENT_TABLES;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_01_000001_create_participants::Migration),
            Box::new(m2025_06_01_000002_create_admin_grants::Migration),
            Box::new(m2025_06_01_000003_create_participant_dependents::Migration),
        ]
    }
}
