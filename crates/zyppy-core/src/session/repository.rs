//! Session repository trait.
//!
//! Defines the interface for persisting the single login identity.

use super::model::Session;
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for the persisted login identity.
///
/// This trait defines the contract for storing and retrieving the one
/// Session record a client keeps, decoupling the application's core logic
/// from the specific storage mechanism (e.g., a JSON file, a keyring, an
/// in-memory map in tests).
///
/// There is at most one persisted session at a time; `save` overwrites any
/// previous record and `clear` removes it.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted session, if any.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Session))`: A well-formed record was found
    /// - `Ok(None)`: No record is stored
    /// - `Err(_)`: The record exists but could not be read or parsed
    async fn load(&self) -> Result<Option<Session>>;

    /// Saves the session, replacing any previously stored record.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Removes the persisted session.
    ///
    /// Removing an absent record is not an error.
    async fn clear(&self) -> Result<()>;
}
