//! # Admin API Handlers
//!
//! Review queue endpoints: list every participant and transition their
//! status. Gated on effective admin privilege by the access policy.

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access::GateContext;
use crate::auth::ViewAsUser;
use crate::error::{ApiError, validation_error};
use crate::handlers::participant::{ParticipantDto, UpdateResponse};
use crate::identity::SessionIdentity;
use crate::models::enums::ParticipantStatus;
use crate::repositories::ParticipantRepository;
use crate::server::AppState;

/// Response payload for the participant listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantListResponse {
    /// All participants, newest first
    pub participants: Vec<ParticipantDto>,
}

/// Request payload for an admin status transition
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Identifier of the participant to update
    pub participant_id: Uuid,
    /// New review status, validated against the fixed set
    #[schema(example = "approved")]
    pub status: Option<String>,
}

/// List all participants for review
#[utoipa::path(
    get,
    path = "/api/admin/users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Participant list", body = ParticipantListResponse),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Caller is not an admin", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
) -> Result<Json<ParticipantListResponse>, ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/admin/users")?;

    let participants = ParticipantRepository::new(&state.db).list_all().await?;

    Ok(Json(ParticipantListResponse {
        participants: participants.into_iter().map(ParticipantDto::from).collect(),
    }))
}

/// Transition a participant's review status
#[utoipa::path(
    patch,
    path = "/api/admin/users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Status updated, or nothing to change", body = UpdateResponse),
        (status = 400, description = "Status outside its fixed enumeration", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Caller is not an admin", body = ApiError),
        (status = 404, description = "Participant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/admin/users")?;

    let Json(request) = payload.map_err(ApiError::from)?;

    let Some(status) = request.status.as_deref() else {
        return Ok(Json(UpdateResponse::ok_with("no changes")));
    };

    let status = status.parse::<ParticipantStatus>().map_err(|err| {
        validation_error("Invalid status value", json!({ "status": err.to_string() }))
    })?;

    let updated = ParticipantRepository::new(&state.db)
        .update_status(request.participant_id, status)
        .await?;

    tracing::info!(
        admin_user_id = %identity.id,
        participant_id = %updated.id,
        status = %status,
        "Participant status updated"
    );

    Ok(Json(UpdateResponse::ok()))
}
