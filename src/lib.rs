//! # Academy API Library
//!
//! This library provides the backend for the academy training-program
//! dashboard: participant lookup and binding, admin review, and the
//! access-control gating layer shared by the API and the navigation guard.

pub mod access;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod repositories;
pub mod server;
pub mod telemetry;
pub use migration;
