//! # Admin Grant Repository
//!
//! Reads and writes for the admin allow-list. Privilege checks re-read the
//! grant on every call, so deactivating a grant takes effect on the next
//! check rather than retroactively.

use crate::error::RepositoryError;
use crate::models::admin_grant::{
    ActiveModel as AdminGrantActiveModel, Column, Entity as AdminGrant, Model as AdminGrantModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

/// Repository for admin grant database operations
pub struct AdminGrantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminGrantRepository<'a> {
    /// Create a new AdminGrantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the given identity holds an active admin grant
    pub async fn has_active_grant(&self, user_id: &str) -> Result<bool, RepositoryError> {
        let grant = self.find_by_user_id(user_id).await?;
        Ok(grant.is_some_and(|g| g.is_active))
    }

    /// Look up the grant for an identity. The column is unique; a second
    /// match is an integrity error.
    pub async fn find_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<AdminGrantModel>, RepositoryError> {
        let mut rows = AdminGrant::find()
            .filter(Column::UserId.eq(user_id))
            .limit(2)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if rows.len() > 1 {
            return Err(RepositoryError::Integrity(format!(
                "multiple admin grants for user {user_id}"
            )));
        }

        Ok(rows.pop())
    }

    /// Create or update the grant for an identity, setting its active flag
    pub async fn upsert_grant(
        &self,
        user_id: &str,
        active: bool,
    ) -> Result<AdminGrantModel, RepositoryError> {
        match self.find_by_user_id(user_id).await? {
            Some(existing) => {
                let mut active_model = existing.into_active_model();
                active_model.is_active = Set(active);
                active_model
                    .update(self.db)
                    .await
                    .map_err(RepositoryError::database_error)
            }
            None => AdminGrantActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id.to_string()),
                is_active: Set(active),
                created_at: Set(Utc::now().into()),
            }
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error),
        }
    }
}
