//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the client configuration
//! from the configuration file (~/.config/zyppy/config.toml).

use crate::paths::ZyppyPaths;
use anyhow::{Context, Result};
use std::fs;
use std::sync::{Arc, RwLock};
use zyppy_core::config::ClientConfig;

/// Configuration service that loads and caches the client configuration.
///
/// This implementation reads the configuration from config.toml and caches
/// it to avoid repeated file I/O operations. A missing file is created with
/// defaults on first load, so a fresh install always starts cleanly.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the client configuration, loading from file if not cached.
    ///
    /// An unreadable or unparsable file falls back to defaults; the client
    /// must always be able to start.
    pub fn get_config(&self) -> ClientConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = Self::load_config().unwrap_or_else(|err| {
            tracing::warn!("[ConfigService] Falling back to defaults: {err:#}");
            ClientConfig::default()
        });

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    /// Loads ClientConfig from the config file, writing defaults if the
    /// file does not exist yet.
    fn load_config() -> Result<ClientConfig> {
        let config_path = ZyppyPaths::config_file()?;

        if !config_path.exists() {
            let default_config = ClientConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            let toml_content = toml::to_string_pretty(&default_config)
                .context("Failed to serialize default config")?;
            fs::write(&config_path, toml_content)
                .context(format!("Failed to write config file: {:?}", config_path))?;
            tracing::info!("[ConfigService] Created default config at {:?}", config_path);
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {:?}", config_path))?;
        let config = toml::from_str(&content)
            .context(format!("Failed to parse config file: {:?}", config_path))?;

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
