//! JSON-based SessionRepository implementation

use crate::paths::ZyppyPaths;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use zyppy_core::session::{Session, SessionRepository};

/// Fixed storage key the login identity is persisted under.
pub const STORAGE_KEY: &str = "zyppy_user";

/// A repository implementation for storing the login identity in a JSON file.
///
/// The record lives at `<base_dir>/zyppy_user.json` and keeps the
/// single-slot semantics of the storage key: one record at a time,
/// overwritten on save, removed on clear. JSON is used because the record
/// is the backend's user object verbatim.
pub struct JsonSessionRepository {
    base_dir: PathBuf,
}

impl JsonSessionRepository {
    /// Creates a new `JsonSessionRepository` with the specified base directory.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir).context("Failed to create session storage directory")?;

        Ok(Self { base_dir })
    }

    /// Creates a `JsonSessionRepository` at the platform data directory
    /// (e.g., `~/.local/share/zyppy`).
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined or
    /// created.
    pub fn default_location() -> Result<Self> {
        let data_dir = ZyppyPaths::data_dir()?;
        Self::new(data_dir)
    }

    /// Returns the file path of the persisted record.
    fn session_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{STORAGE_KEY}.json"))
    }
}

#[async_trait]
impl SessionRepository for JsonSessionRepository {
    async fn load(&self) -> Result<Option<Session>> {
        let file_path = self.session_file_path();

        if !file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&file_path)
            .context(format!("Failed to read session file: {:?}", file_path))?;
        let session = serde_json::from_str(&content)
            .context(format!("Failed to parse session file: {:?}", file_path))?;

        tracing::debug!("[JsonSessionRepository] Loaded persisted session");
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let file_path = self.session_file_path();

        let json = serde_json::to_string_pretty(session)
            .context("Failed to serialize session data to JSON")?;

        fs::write(&file_path, json)
            .context(format!("Failed to write session file: {:?}", file_path))?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let file_path = self.session_file_path();

        if file_path.exists() {
            fs::remove_file(&file_path)
                .context(format!("Failed to delete session file: {:?}", file_path))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_session() -> Session {
        Session {
            id: "user-1".to_string(),
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            address: Some("42 Foo St".to_string()),
            created_at: Some("2024-01-01T00:00:00".to_string()),
        }
    }

    #[tokio::test]
    async fn test_load_without_record_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        assert_eq!(repository.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        let session = create_test_session();
        repository.save(&session).await.unwrap();

        let loaded = repository.load().await.unwrap();
        assert_eq!(loaded, Some(session));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        repository.save(&create_test_session()).await.unwrap();

        let mut replacement = create_test_session();
        replacement.id = "user-2".to_string();
        replacement.email = "bob@example.com".to_string();
        repository.save(&replacement).await.unwrap();

        let loaded = repository.load().await.unwrap().unwrap();
        assert_eq!(loaded.id, "user-2");
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        repository.save(&create_test_session()).await.unwrap();
        repository.clear().await.unwrap();

        assert_eq!(repository.load().await.unwrap(), None);

        // Clearing again is not an error
        repository.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_record_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        let file_path = temp_dir.path().join(format!("{STORAGE_KEY}.json"));
        fs::write(&file_path, "{not json").unwrap();

        assert!(repository.load().await.is_err());
    }

    #[tokio::test]
    async fn test_record_file_is_named_after_storage_key() {
        let temp_dir = TempDir::new().unwrap();
        let repository = JsonSessionRepository::new(temp_dir.path()).unwrap();

        repository.save(&create_test_session()).await.unwrap();

        assert!(temp_dir.path().join("zyppy_user.json").exists());
    }
}
