//! # Repositories
//!
//! Database access layer wrapping the SeaORM entities. All uniqueness-assumed
//! lookups verify that at most one row matched; a second row is surfaced as an
//! integrity error, never resolved by picking one.

pub mod admin_grant;
pub mod participant;

pub use admin_grant::AdminGrantRepository;
pub use participant::{ParticipantRepository, ProfileChanges};
