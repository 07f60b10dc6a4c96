//! # Participant Repository
//!
//! Lookups and lifecycle mutations for participant records: the unique-key
//! lookups behind identity resolution, the first-login bind, validated profile
//! updates, admin status transitions, and the cascading account delete.

use crate::error::RepositoryError;
use crate::identity::SessionIdentity;
use crate::models::enums::{ParticipantStatus, Role, Stream, Team};
use crate::models::participant::{Column, Entity as Participant, Model as ParticipantModel};
use chrono::Utc;
use migration::DEPENDENT_TABLES;
use sea_orm::sea_query::{Alias, Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

/// Validated profile fields accepted by the participant update step
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub role: Option<Role>,
    pub team: Option<Team>,
    pub stream: Option<Stream>,
}

/// Repository for participant database operations
pub struct ParticipantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ParticipantRepository<'a> {
    /// Create a new ParticipantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up a participant by email. The column is unique; a second match
    /// is an integrity error.
    pub async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ParticipantModel>, RepositoryError> {
        self.unique_one(Column::Email, email, "email").await
    }

    /// Look up a participant by linked GitHub username.
    pub async fn find_by_github_username(
        &self,
        github_username: &str,
    ) -> Result<Option<ParticipantModel>, RepositoryError> {
        self.unique_one(Column::GithubUsername, github_username, "github_username")
            .await
    }

    /// Look up a participant by the identity it is bound to.
    pub async fn find_by_auth_user_id(
        &self,
        auth_user_id: &str,
    ) -> Result<Option<ParticipantModel>, RepositoryError> {
        self.unique_one(Column::AuthUserId, auth_user_id, "auth_user_id")
            .await
    }

    /// Get participant by internal ID
    pub async fn find_by_id(
        &self,
        participant_id: Uuid,
    ) -> Result<Option<ParticipantModel>, RepositoryError> {
        Participant::find_by_id(participant_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List all participants, newest first
    pub async fn list_all(&self) -> Result<Vec<ParticipantModel>, RepositoryError> {
        Participant::find()
            .order_by_desc(Column::CreatedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Bind the participant record to the given identity and apply any
    /// validated profile changes in one write.
    ///
    /// The identity link is always set. The GitHub username and avatar from
    /// the session are only filled in when the record has none yet; values
    /// already stored are never overwritten. Returns whether anything was
    /// written, so callers can report "no changes" without a second read.
    pub async fn bind_and_update(
        &self,
        participant: ParticipantModel,
        identity: &SessionIdentity,
        changes: &ProfileChanges,
    ) -> Result<bool, RepositoryError> {
        let current = participant.clone();
        let mut active = participant.into_active_model();
        let mut changed = false;

        if current.auth_user_id.as_deref() != Some(identity.id.as_str()) {
            active.auth_user_id = Set(Some(identity.id.clone()));
            changed = true;
        }

        if current.github_username.is_none()
            && let Some(github_username) = identity.github_username.as_deref()
        {
            active.github_username = Set(Some(github_username.to_string()));
            changed = true;
        }

        if current.avatar_url.is_none()
            && let Some(avatar_url) = identity.avatar_url.as_deref()
        {
            active.avatar_url = Set(Some(avatar_url.to_string()));
            changed = true;
        }

        if let Some(role) = changes.role
            && current.role.as_deref() != Some(role.as_str())
        {
            active.role = Set(Some(role.as_str().to_string()));
            changed = true;
        }

        if let Some(team) = changes.team
            && current.team.as_deref() != Some(team.as_str())
        {
            active.team = Set(Some(team.as_str().to_string()));
            changed = true;
        }

        if let Some(stream) = changes.stream
            && current.stream.as_deref() != Some(stream.as_str())
        {
            active.stream = Set(Some(stream.as_str().to_string()));
            changed = true;
        }

        if changed {
            active.updated_at = Set(Utc::now().into());
            active
                .update(self.db)
                .await
                .map_err(RepositoryError::database_error)?;
        }

        Ok(changed)
    }

    /// Transition a participant's review status
    pub async fn update_status(
        &self,
        participant_id: Uuid,
        status: ParticipantStatus,
    ) -> Result<ParticipantModel, RepositoryError> {
        let participant = self
            .find_by_id(participant_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("Participant {participant_id}")))?;

        let mut active = participant.into_active_model();
        active.status = Set(Some(status.as_str().to_string()));
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Delete a participant and everything that references it.
    ///
    /// Dependent tables are cleared one statement at a time, in a fixed order,
    /// before the participant row itself. There is no cross-table transaction:
    /// a failure partway leaves orphaned dependent rows but never a deleted
    /// participant with live dependents.
    pub async fn delete_account(&self, participant_id: Uuid) -> Result<(), RepositoryError> {
        let backend = self.db.get_database_backend();

        for (table, participant_column) in DEPENDENT_TABLES {
            let delete = Query::delete()
                .from_table(Alias::new(*table))
                .and_where(Expr::col(Alias::new(*participant_column)).eq(participant_id))
                .to_owned();

            self.db
                .execute(backend.build(&delete))
                .await
                .map_err(RepositoryError::database_error)?;
        }

        Participant::delete_by_id(participant_id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }

    async fn unique_one(
        &self,
        column: Column,
        value: &str,
        key: &'static str,
    ) -> Result<Option<ParticipantModel>, RepositoryError> {
        let mut rows = Participant::find()
            .filter(column.eq(value))
            .limit(2)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if rows.len() > 1 {
            return Err(RepositoryError::Integrity(format!(
                "multiple participants matched unique {key} lookup"
            )));
        }

        Ok(rows.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::participant::ActiveModel as ParticipantActiveModel;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_participant(
        db: &DatabaseConnection,
        email: Option<&str>,
        github_username: Option<&str>,
    ) -> ParticipantModel {
        let now = Utc::now();
        ParticipantActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.map(String::from)),
            github_username: Set(github_username.map(String::from)),
            display_name: Set("Test Participant".to_string()),
            avatar_url: Set(None),
            role: Set(None),
            team: Set(None),
            stream: Set(None),
            status: Set(Some("pending".to_string())),
            is_admin: Set(false),
            is_mentor: Set(None),
            auth_user_id: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .unwrap()
    }

    fn identity(id: &str, email: Option<&str>, github_username: Option<&str>) -> SessionIdentity {
        SessionIdentity {
            id: id.to_string(),
            email: email.map(String::from),
            github_username: github_username.map(String::from),
            avatar_url: Some("https://avatars.test/u/1".to_string()),
        }
    }

    async fn insert_dependent_row(db: &DatabaseConnection, table: &str, column: &str, id: Uuid) {
        let insert = Query::insert()
            .into_table(Alias::new(table))
            .columns([Alias::new("id"), Alias::new(column)])
            .values_panic([Uuid::new_v4().into(), id.into()])
            .to_owned();
        db.execute(db.get_database_backend().build(&insert))
            .await
            .unwrap();
    }

    async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
        let select = Query::select()
            .expr(Expr::col(Alias::new("id")).count())
            .from(Alias::new(table))
            .to_owned();
        let row = db
            .query_one(db.get_database_backend().build(&select))
            .await
            .unwrap()
            .unwrap();
        row.try_get_by_index::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn first_bind_sets_identity_link_and_fills_empty_fields() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), None).await;
        let repo = ParticipantRepository::new(&db);

        let changed = repo
            .bind_and_update(
                participant.clone(),
                &identity("user_1", Some("a@x.com"), Some("octocat")),
                &ProfileChanges::default(),
            )
            .await
            .unwrap();
        assert!(changed);

        let stored = repo.find_by_id(participant.id).await.unwrap().unwrap();
        assert_eq!(stored.auth_user_id.as_deref(), Some("user_1"));
        assert_eq!(stored.github_username.as_deref(), Some("octocat"));
        assert_eq!(
            stored.avatar_url.as_deref(),
            Some("https://avatars.test/u/1")
        );
    }

    #[tokio::test]
    async fn second_bind_with_same_identity_changes_nothing() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), None).await;
        let repo = ParticipantRepository::new(&db);
        let session = identity("user_1", Some("a@x.com"), Some("octocat"));

        repo.bind_and_update(participant.clone(), &session, &ProfileChanges::default())
            .await
            .unwrap();
        let after_first = repo.find_by_id(participant.id).await.unwrap().unwrap();

        let changed = repo
            .bind_and_update(after_first.clone(), &session, &ProfileChanges::default())
            .await
            .unwrap();
        assert!(!changed);

        let after_second = repo.find_by_id(participant.id).await.unwrap().unwrap();
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn bind_never_overwrites_existing_github_username() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), Some("original")).await;
        let repo = ParticipantRepository::new(&db);

        repo.bind_and_update(
            participant.clone(),
            &identity("user_1", Some("a@x.com"), Some("different")),
            &ProfileChanges::default(),
        )
        .await
        .unwrap();

        let stored = repo.find_by_id(participant.id).await.unwrap().unwrap();
        assert_eq!(stored.github_username.as_deref(), Some("original"));
        assert_eq!(stored.auth_user_id.as_deref(), Some("user_1"));
    }

    #[tokio::test]
    async fn bind_applies_validated_profile_changes() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), None).await;
        let repo = ParticipantRepository::new(&db);

        let changes = ProfileChanges {
            role: Some(Role::Engineering),
            team: Some(Team::Cobalt),
            stream: Some(Stream::Builder),
        };
        repo.bind_and_update(
            participant.clone(),
            &identity("user_1", Some("a@x.com"), None),
            &changes,
        )
        .await
        .unwrap();

        let stored = repo.find_by_id(participant.id).await.unwrap().unwrap();
        assert_eq!(stored.role.as_deref(), Some("engineering"));
        assert_eq!(stored.team.as_deref(), Some("cobalt"));
        assert_eq!(stored.stream.as_deref(), Some("builder"));
    }

    #[tokio::test]
    async fn update_status_transitions_known_record() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), None).await;
        let repo = ParticipantRepository::new(&db);

        let updated = repo
            .update_status(participant.id, ParticipantStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.status.as_deref(), Some("approved"));
    }

    #[tokio::test]
    async fn update_status_for_missing_record_is_not_found() {
        let db = setup_db().await;
        let repo = ParticipantRepository::new(&db);

        let result = repo
            .update_status(Uuid::new_v4(), ParticipantStatus::Approved)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_account_removes_dependents_then_participant() {
        let db = setup_db().await;
        let participant = insert_participant(&db, Some("a@x.com"), None).await;
        let other = insert_participant(&db, Some("b@x.com"), None).await;
        let repo = ParticipantRepository::new(&db);

        for (table, column) in DEPENDENT_TABLES {
            insert_dependent_row(&db, table, column, participant.id).await;
            insert_dependent_row(&db, table, column, other.id).await;
        }

        repo.delete_account(participant.id).await.unwrap();

        for (table, _) in DEPENDENT_TABLES {
            assert_eq!(count_rows(&db, table).await, 1, "table {table}");
        }
        assert!(repo.find_by_id(participant.id).await.unwrap().is_none());
        assert!(repo.find_by_id(other.id).await.unwrap().is_some());

        // Deleting again is a no-op, not an error.
        repo.delete_account(participant.id).await.unwrap();
    }

    #[tokio::test]
    async fn list_all_orders_newest_first() {
        let db = setup_db().await;
        let repo = ParticipantRepository::new(&db);

        let older = ParticipantActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(Some("old@x.com".to_string())),
            github_username: Set(None),
            display_name: Set("Old".to_string()),
            avatar_url: Set(None),
            role: Set(None),
            team: Set(None),
            stream: Set(None),
            status: Set(Some("pending".to_string())),
            is_admin: Set(false),
            is_mentor: Set(None),
            auth_user_id: Set(None),
            created_at: Set((Utc::now() - chrono::Duration::days(1)).into()),
            updated_at: Set(Utc::now().into()),
        }
        .insert(&db)
        .await
        .unwrap();
        let newer = insert_participant(&db, Some("new@x.com"), None).await;

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);
    }
}
