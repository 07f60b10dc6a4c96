//! # Participant API Handlers
//!
//! Endpoints for the caller's own participant record: lookup via the
//! identity resolver, the bind-and-update step, and the lightweight admin
//! probe used by the navigation chrome.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::access::GateContext;
use crate::auth::ViewAsUser;
use crate::error::{ApiError, forbidden, not_found, validation_error};
use crate::identity::SessionIdentity;
use crate::models::enums::{Role, Stream, Team};
use crate::models::participant::Model as ParticipantModel;
use crate::repositories::{ParticipantRepository, ProfileChanges};
use crate::server::AppState;

/// Participant record as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantDto {
    /// Unique identifier (UUID)
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub email: Option<String>,
    pub github_username: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub display_name: String,
    pub avatar_url: Option<String>,
    #[schema(example = "engineering")]
    pub role: Option<String>,
    #[schema(example = "cobalt")]
    pub team: Option<String>,
    #[schema(example = "builder")]
    pub stream: Option<String>,
    #[schema(example = "approved")]
    pub status: Option<String>,
    pub is_admin: bool,
    pub is_mentor: Option<bool>,
    /// Timestamp when the record was created (ISO 8601)
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub created_at: String,
    /// Timestamp of the last update (ISO 8601)
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub updated_at: String,
}

impl From<ParticipantModel> for ParticipantDto {
    fn from(model: ParticipantModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            github_username: model.github_username,
            display_name: model.display_name,
            avatar_url: model.avatar_url,
            role: model.role,
            team: model.team,
            stream: model.stream,
            status: model.status,
            is_admin: model.is_admin,
            is_mentor: model.is_mentor,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the participant lookup
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    /// The caller's participant record, or null when none is registered
    pub participant: Option<ParticipantDto>,
}

/// Request payload for the participant update step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateParticipantRequest {
    /// Identifier of the record to bind and update
    pub participant_id: Uuid,
    /// New role value, validated against the fixed set
    #[schema(example = "engineering")]
    pub role: Option<String>,
    /// New team value, validated against the fixed set
    #[schema(example = "cobalt")]
    pub team: Option<String>,
    /// New stream value, validated against the fixed set
    #[schema(example = "builder")]
    pub stream: Option<String>,
}

/// Response payload for update-style endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok_with(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
        }
    }
}

/// Look up the caller's participant record
#[utoipa::path(
    get,
    path = "/api/participant",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Resolution result, participant may be null", body = ParticipantResponse),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "participant"
)]
pub async fn get_participant(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/participant")?;

    Ok(Json(ParticipantResponse {
        participant: ctx.participant.map(ParticipantDto::from),
    }))
}

/// Bind the record to the caller and apply validated profile changes
#[utoipa::path(
    patch,
    path = "/api/participant",
    security(("bearer_auth" = [])),
    request_body = UpdateParticipantRequest,
    responses(
        (status = 200, description = "Update applied, or nothing to change", body = UpdateResponse),
        (status = 400, description = "Value outside its fixed enumeration", body = ApiError),
        (status = 401, description = "Missing or invalid session token", body = ApiError),
        (status = 403, description = "Record belongs to a different identity", body = ApiError),
        (status = 404, description = "Participant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "participant"
)]
pub async fn update_participant(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
    payload: Result<Json<UpdateParticipantRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/participant")?;

    let Json(request) = payload.map_err(ApiError::from)?;

    let changes = parse_profile_changes(&request)?;

    let repo = ParticipantRepository::new(&state.db);
    let participant = repo
        .find_by_id(request.participant_id)
        .await?
        .ok_or_else(|| not_found("Participant not found"))?;

    // Ownership check: a record already bound to another identity is off
    // limits, whatever lookup key got the caller here.
    if let Some(bound_to) = participant.auth_user_id.as_deref()
        && bound_to != identity.id
    {
        return Err(forbidden(Some(
            "Participant record belongs to a different account",
        )));
    }

    let changed = repo.bind_and_update(participant, &identity, &changes).await?;

    if changed {
        Ok(Json(UpdateResponse::ok()))
    } else {
        Ok(Json(UpdateResponse::ok_with("no changes")))
    }
}

/// Report effective admin privilege without a body
#[utoipa::path(
    head,
    path = "/api/participant",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Privilege reported", headers(
            ("X-Is-Admin", description = "true when the caller holds effective admin privilege")
        )),
        (status = 401, description = "Missing or invalid session token", body = ApiError)
    ),
    tag = "participant"
)]
pub async fn head_participant(
    State(state): State<AppState>,
    identity: SessionIdentity,
    ViewAsUser(view_as_user): ViewAsUser,
) -> Result<(StatusCode, [(&'static str, String); 1]), ApiError> {
    let ctx = GateContext::load(&state.db, &identity, view_as_user).await?;
    ctx.authorize("/api/participant")?;

    Ok((
        StatusCode::OK,
        [("X-Is-Admin", ctx.is_admin().to_string())],
    ))
}

fn parse_profile_changes(request: &UpdateParticipantRequest) -> Result<ProfileChanges, ApiError> {
    let mut changes = ProfileChanges::default();

    if let Some(role) = request.role.as_deref() {
        changes.role = Some(role.parse::<Role>().map_err(|err| {
            validation_error("Invalid role value", json!({ "role": err.to_string() }))
        })?);
    }

    if let Some(team) = request.team.as_deref() {
        changes.team = Some(team.parse::<Team>().map_err(|err| {
            validation_error("Invalid team value", json!({ "team": err.to_string() }))
        })?);
    }

    if let Some(stream) = request.stream.as_deref() {
        changes.stream = Some(stream.parse::<Stream>().map_err(|err| {
            validation_error("Invalid stream value", json!({ "stream": err.to_string() }))
        })?);
    }

    Ok(changes)
}
