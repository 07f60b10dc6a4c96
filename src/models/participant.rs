//! Participant entity model
//!
//! This module contains the SeaORM entity model for the participants table,
//! the domain record for a program registrant. Records are created by the
//! external registration flow and bound to an identity-provider user id on
//! first login.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    /// Unique identifier for the participant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address, unique when present
    pub email: Option<String>,

    /// Linked GitHub account username, unique when present.
    /// First write wins: once set it is never overwritten by a bind.
    pub github_username: Option<String>,

    pub display_name: String,

    /// Avatar reference; first write wins, like github_username
    pub avatar_url: Option<String>,

    /// Program role, one of [`crate::models::enums::Role`]
    pub role: Option<String>,

    /// Team assignment, one of [`crate::models::enums::Team`]
    pub team: Option<String>,

    /// Learning stream, one of [`crate::models::enums::Stream`]
    pub stream: Option<String>,

    /// Lifecycle status (pending/approved/rejected); legacy rows may carry
    /// no value at all
    pub status: Option<String>,

    pub is_admin: bool,

    pub is_mentor: Option<bool>,

    /// Identity-provider user id this record is bound to; null until the
    /// first login match
    pub auth_user_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
