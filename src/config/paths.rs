//! Path management for fleetcost
//!
//! ## Path Resolution Order
//!
//! 1. `FLEETCOST_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/fleetcost` on Linux, `~/Library/Application Support/fleetcost`
//!    on macOS, `%APPDATA%\fleetcost\config` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{FleetError, FleetResult};

/// Environment variable that overrides the config directory
pub const CONFIG_DIR_ENV: &str = "FLEETCOST_CONFIG_DIR";

/// Manages all paths used by fleetcost
#[derive(Debug, Clone)]
pub struct FleetPaths {
    base_dir: PathBuf,
}

impl FleetPaths {
    /// Resolve the config directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override is not set.
    pub fn new() -> FleetResult<Self> {
        let base_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "fleetcost")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    FleetError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create FleetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn ensure_directories(&self) -> FleetResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FleetError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Check whether a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
