//! # Access Control
//!
//! The gating layer, leaf to root: identity resolution, role classification,
//! status evaluation, the pure access policy, and the two enforcement
//! surfaces that consume it. Server-side handlers load a [`GateContext`] per
//! request; the client navigation model lives in [`gate`].

pub mod classify;
pub mod gate;
pub mod policy;
pub mod resolver;
pub mod status;

use sea_orm::DatabaseConnection;

use crate::error::{ApiError, RepositoryError, forbidden, unauthorized};
use crate::identity::SessionIdentity;
use crate::models::participant::Model as ParticipantModel;

pub use classify::{RoleFlags, classify};
pub use gate::NavigationGate;
pub use policy::{Decision, DenyReason, PolicyInputs, Surface, decide};
pub use resolver::resolve;
pub use status::{Status, evaluate_status};

/// Per-request access state: the resolved participant, privilege flags and
/// effective status for the authenticated identity. Loaded fresh on every
/// request; nothing here outlives it.
#[derive(Debug, Clone)]
pub struct GateContext {
    pub participant: Option<ParticipantModel>,
    pub flags: RoleFlags,
    pub view_as_user: bool,
    pub status: Status,
}

impl GateContext {
    /// Resolve and classify the identity, then evaluate its status. The
    /// view-as-user override masks admin privilege for everything derived
    /// here, including the status evaluation.
    pub async fn load(
        db: &DatabaseConnection,
        identity: &SessionIdentity,
        view_as_user: bool,
    ) -> Result<Self, RepositoryError> {
        let participant = resolve(db, &identity.id, identity.hints()).await?;
        let flags = classify(db, &identity.id, participant.as_ref()).await;
        let status = evaluate_status(participant.as_ref(), flags.is_admin && !view_as_user);

        Ok(Self {
            participant,
            flags,
            view_as_user,
            status,
        })
    }

    /// Effective admin privilege after the view-as-user mask.
    pub fn is_admin(&self) -> bool {
        self.flags.is_admin && !self.view_as_user
    }

    /// Run the access policy for an API path, mapping denials to the
    /// corresponding error responses.
    pub fn authorize(&self, path: &str) -> Result<(), ApiError> {
        let inputs = PolicyInputs::api(true, self.flags.is_admin, self.view_as_user, self.status);
        match decide(path, &inputs) {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(unauthorized(None)),
            Decision::Deny(DenyReason::Forbidden) => Err(forbidden(None)),
            // The API surface never waits or redirects.
            Decision::Wait | Decision::RedirectTo(_) => Err(forbidden(None)),
        }
    }
}
