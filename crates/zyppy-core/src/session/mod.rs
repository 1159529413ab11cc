//! Session domain module.
//!
//! This module contains the session-related domain model and the
//! repository interface for persisting it.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`Session`)
//! - `repository`: Repository trait for session persistence
//!
//! # Usage
//!
//! ```ignore
//! use zyppy_core::session::{Session, SessionRepository};
//! ```

mod model;
mod repository;

// Re-export public API
pub use model::Session;
pub use repository::SessionRepository;
