//! # Identity Resolver
//!
//! Maps a session identity to zero or one participant record, trying lookup
//! keys in a fixed precedence order: email, then linked GitHub username, then
//! the identity link itself. The first match wins and later keys are never
//! consulted. Side-effect free; binding is a separate, explicit step.

use sea_orm::DatabaseConnection;

use crate::error::RepositoryError;
use crate::identity::ResolveHints;
use crate::models::participant::Model as ParticipantModel;
use crate::repositories::ParticipantRepository;

/// Resolve an identity to its participant record, if any.
///
/// Each underlying lookup is against a unique-constrained column; more than
/// one match surfaces as [`RepositoryError::Integrity`], never a silent pick.
pub async fn resolve(
    db: &DatabaseConnection,
    identity_id: &str,
    hints: ResolveHints<'_>,
) -> Result<Option<ParticipantModel>, RepositoryError> {
    let repo = ParticipantRepository::new(db);

    if let Some(email) = hints.email
        && let Some(participant) = repo.find_by_email(email).await?
    {
        return Ok(Some(participant));
    }

    if let Some(github_username) = hints.github_username
        && let Some(participant) = repo.find_by_github_username(github_username).await?
    {
        return Ok(Some(participant));
    }

    repo.find_by_auth_user_id(identity_id).await
}
