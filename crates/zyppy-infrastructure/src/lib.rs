pub mod config_service;
pub mod json_session_repository;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::json_session_repository::{JsonSessionRepository, STORAGE_KEY};
pub use crate::paths::ZyppyPaths;
