//! # Role Classifier
//!
//! Determines elevated privilege for an identity. Admin privilege has two
//! independent sources: the participant record's own flag, and an entry in
//! the admin allow-list. Either alone is sufficient. Nothing is cached; each
//! call re-reads current state, so revocation applies on the next check.

use sea_orm::DatabaseConnection;

use crate::models::participant::Model as ParticipantModel;
use crate::repositories::AdminGrantRepository;

/// Privilege flags for the current identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_mentor: bool,
}

/// Classify the identity's privilege from its participant record and the
/// admin allow-list.
///
/// A failed allow-list read degrades to no privilege. The check must not
/// fail open: an unreadable grant store grants nothing.
pub async fn classify(
    db: &DatabaseConnection,
    identity_id: &str,
    participant: Option<&ParticipantModel>,
) -> RoleFlags {
    let record_admin = participant.is_some_and(|p| p.is_admin);
    let is_mentor = participant.and_then(|p| p.is_mentor).unwrap_or(false);

    let granted_admin = if record_admin {
        // Already privileged via the record; the allow-list cannot add more.
        false
    } else {
        match AdminGrantRepository::new(db)
            .has_active_grant(identity_id)
            .await
        {
            Ok(active) => active,
            Err(err) => {
                tracing::warn!(
                    user_id = %identity_id,
                    error = %err,
                    "Admin grant check failed, treating identity as non-admin"
                );
                false
            }
        }
    };

    RoleFlags {
        is_admin: record_admin || granted_admin,
        is_mentor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use uuid::Uuid;

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn participant(is_admin: bool, is_mentor: Option<bool>) -> ParticipantModel {
        let now = Utc::now();
        ParticipantModel {
            id: Uuid::new_v4(),
            email: None,
            github_username: None,
            display_name: "Test".to_string(),
            avatar_url: None,
            role: None,
            team: None,
            stream: None,
            status: Some("approved".to_string()),
            is_admin,
            is_mentor,
            auth_user_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn record_flag_alone_is_sufficient() {
        let db = setup_db().await;
        let p = participant(true, None);

        let flags = classify(&db, "user_1", Some(&p)).await;
        assert!(flags.is_admin);
    }

    #[tokio::test]
    async fn active_grant_alone_is_sufficient() {
        let db = setup_db().await;
        AdminGrantRepository::new(&db)
            .upsert_grant("user_1", true)
            .await
            .unwrap();

        let flags = classify(&db, "user_1", None).await;
        assert!(flags.is_admin);
        assert!(!flags.is_mentor);
    }

    #[tokio::test]
    async fn no_source_means_no_privilege() {
        let db = setup_db().await;
        let p = participant(false, Some(true));

        let flags = classify(&db, "user_1", Some(&p)).await;
        assert!(!flags.is_admin);
        assert!(flags.is_mentor);
    }

    #[tokio::test]
    async fn revoked_grant_applies_on_next_check() {
        let db = setup_db().await;
        let repo = AdminGrantRepository::new(&db);
        repo.upsert_grant("user_1", true).await.unwrap();
        assert!(classify(&db, "user_1", None).await.is_admin);

        repo.upsert_grant("user_1", false).await.unwrap();
        assert!(!classify(&db, "user_1", None).await.is_admin);
    }

    #[tokio::test]
    async fn unreadable_grant_store_grants_nothing() {
        // A connection with no schema makes the grant lookup fail.
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let flags = classify(&db, "user_1", None).await;
        assert!(!flags.is_admin);
    }
}
