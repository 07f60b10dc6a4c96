//! # Account API Handlers
//!
//! Account removal: a cascading delete of everything referencing the
//! caller's participant record, then the record itself.

use axum::{extract::State, response::Json};

use crate::access::GateContext;
use crate::auth::ViewAsUser;
use crate::error::ApiError;
use crate::handlers::participant::UpdateResponse;
use crate::identity::SessionIdentity;
use crate::repositories::ParticipantRepository;
use crate::server::AppState;

/// Delete the caller's account and all dependent records
#[utoipa::path(
    delete,
    path = "/api/account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account removed, or nothing left to remove", body = UpdateResponse),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "account"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
) -> Result<Json<UpdateResponse>, ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/account")?;

    // Idempotent: with no record left to delete the request still succeeds.
    let Some(participant) = ctx.participant else {
        return Ok(Json(UpdateResponse::ok_with("no account data found")));
    };

    ParticipantRepository::new(&state.db)
        .delete_account(participant.id)
        .await?;

    tracing::info!(
        user_id = %identity.id,
        participant_id = %participant.id,
        "Account deleted"
    );

    Ok(Json(UpdateResponse::ok()))
}
