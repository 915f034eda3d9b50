//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\media-minder\config.toml
//! - macOS: ~/Library/Application Support/media-minder/config.toml
//! - Linux: ~/.config/media-minder/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded at
//! startup; a missing or unparseable file falls back to defaults with a
//! warning. Library root validation is the exception: overlapping roots are
//! fatal (see [`MediaRoots::new`]).
//!
//! [`MediaRoots::new`]: crate::roots::MediaRoots::new

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::roots::MediaRoots;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library root directories, one per media kind
    pub library: LibraryConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,
}

/// Library root directories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Root directory for movie files
    pub movies_root: PathBuf,

    /// Root directory for TV episode files
    pub tv_root: PathBuf,

    /// Root directory for music files
    pub music_root: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            movies_root: PathBuf::from("/media/movies"),
            tv_root: PathBuf::from("/media/tv"),
            music_root: PathBuf::from("/media/music"),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::catalog::DEFAULT_DB_NAME),
        }
    }
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// TMDB API key for movie and TV lookups
    pub tmdb_api_key: Option<String>,

    /// Spotify client id for album lookups
    pub spotify_client_id: Option<String>,

    /// Spotify client secret for album lookups
    pub spotify_client_secret: Option<String>,
}

impl Config {
    /// Validate the library roots and return them as a [`MediaRoots`].
    ///
    /// This is the startup gate: duplicate or nested roots abort the
    /// process before any watcher or database work begins.
    pub fn media_roots(&self) -> Result<MediaRoots> {
        MediaRoots::new(
            &self.library.movies_root,
            &self.library.tv_root,
            &self.library.music_root,
        )
    }

    /// SQLite connection URL for the configured database path.
    pub fn db_url(&self) -> String {
        format!("sqlite:{}", self.database.path.display())
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("media-minder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path (the `--config` override).
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}
