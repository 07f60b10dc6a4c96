//! # Status Evaluator
//!
//! Derives the effective account lifecycle state from a participant record,
//! or its absence.

use serde::{Deserialize, Serialize};

use crate::models::enums::ParticipantStatus;
use crate::models::participant::Model as ParticipantModel;

/// Effective account lifecycle state used by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NoProfile,
    Pending,
    Approved,
    Rejected,
}

/// Derive the effective status for an identity.
///
/// Admins bypass the approval workflow entirely, whatever their own record
/// says. A missing or unrecognized stored status degrades to approved rather
/// than locking out legacy rows that predate the column.
pub fn evaluate_status(participant: Option<&ParticipantModel>, is_admin: bool) -> Status {
    if is_admin {
        return Status::Approved;
    }

    let Some(participant) = participant else {
        return Status::NoProfile;
    };

    match participant
        .status
        .as_deref()
        .and_then(|s| s.parse::<ParticipantStatus>().ok())
    {
        Some(ParticipantStatus::Pending) => Status::Pending,
        Some(ParticipantStatus::Rejected) => Status::Rejected,
        Some(ParticipantStatus::Approved) | None => Status::Approved,
    }
}
