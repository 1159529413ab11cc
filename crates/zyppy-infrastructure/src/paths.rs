//! Unified path management for zyppy client files.
//!
//! All client state lives under the platform's standard directories,
//! resolved via the `dirs` crate. This ensures consistency across all
//! platforms (Linux, macOS, Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for the zyppy client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/zyppy/             # Config directory
/// └── config.toml              # Client configuration
///
/// ~/.local/share/zyppy/        # Data directory
/// └── zyppy_user.json          # Persisted login identity
/// ```
pub struct ZyppyPaths;

impl ZyppyPaths {
    /// Returns the zyppy configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/zyppy/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("zyppy"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the zyppy data directory, used for persisted client state.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to data directory (e.g., `~/.local/share/zyppy/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join("zyppy"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = ZyppyPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("zyppy"));
    }

    #[test]
    fn test_config_file() {
        let config_file = ZyppyPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        // Verify it's under config_dir
        let config_dir = ZyppyPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_data_dir() {
        let data_dir = ZyppyPaths::data_dir().unwrap();
        assert!(data_dir.ends_with("zyppy"));
    }
}
