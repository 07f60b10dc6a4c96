//! # Data Models
//!
//! This module contains the SeaORM entities and domain enumerations used
//! throughout the Academy API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod admin_grant;
pub mod enums;
pub mod participant;

pub use admin_grant::Entity as AdminGrant;
pub use participant::Entity as Participant;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "academy-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
