//! Session domain model.
//!
//! This module contains the core Session entity that represents
//! an authenticated storefront user in the application's domain layer.

use serde::{Deserialize, Serialize};

/// The authenticated identity of the storefront user.
///
/// A session mirrors the user record the backend returns from the login
/// exchange. It is held in memory for the lifetime of the process and
/// persisted as a single record so the identity survives restarts.
///
/// A session is required to reach any screen other than the login screen;
/// the screen layer enforces that gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier assigned by the backend
    pub id: String,
    /// Display name (the backend derives it from the email on first login)
    pub name: String,
    /// Login email address
    pub email: String,
    /// Contact phone number, if the user provided one
    #[serde(default)]
    pub phone: Option<String>,
    /// Saved delivery address, used to prefill checkout
    #[serde(default)]
    pub address: Option<String>,
    /// Timestamp when the account was created (ISO 8601 format)
    #[serde(default)]
    pub created_at: Option<String>,
}
