use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_IO_TIMEOUT_SECS, MAX_RECENT_FILES};

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

fn default_io_timeout_secs() -> f32 {
    DEFAULT_IO_TIMEOUT_SECS
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Favorites file to use instead of the default location
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,

    /// Write a PNG next to the favorites file for every synthesized icon
    #[serde(default)]
    pub export_favorite_icons: bool,

    /// Deadline for background I/O (preview loads, icon exports)
    #[serde(default = "default_io_timeout_secs")]
    pub io_timeout_secs: f32,

    /// Recently used favorites files for quick access
    #[serde(default)]
    pub recent_favorites_files: Vec<PathBuf>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            favorites_path: None,
            export_favorite_icons: false,
            io_timeout_secs: DEFAULT_IO_TIMEOUT_SECS,
            recent_favorites_files: Vec::new(),
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

impl AppConfig {
    /// Favorites file in use: the configured one or the platform default
    pub fn favorites_path(&self) -> PathBuf {
        self.data
            .favorites_path
            .clone()
            .unwrap_or_else(crate::paths::default_favorites_file)
    }

    /// I/O timeout, falling back to the default for non-positive values
    pub fn io_timeout(&self) -> Duration {
        let secs = self.data.io_timeout_secs;
        if secs.is_finite() && secs > 0.0 {
            Duration::from_secs_f32(secs)
        } else {
            Duration::from_secs_f32(DEFAULT_IO_TIMEOUT_SECS)
        }
    }
}

/// Resource for the "favorites file missing" warning
#[derive(Resource, Default)]
pub struct MissingFavoritesWarning {
    pub show: bool,
    pub path: Option<PathBuf>,
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to set the favorites file path
#[derive(Message)]
pub struct SetFavoritesPathRequest {
    pub path: PathBuf,
}

/// Message to add a favorites file to the recent list
#[derive(Message)]
pub struct AddRecentFavoritesFileRequest {
    pub path: PathBuf,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Result of loading config from disk
struct LoadConfigResult {
    config: AppConfig,
    /// Error message if config was reset to defaults due to an error
    reset_reason: Option<String>,
}

/// Parse config JSON, falling back to defaults with a reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config() -> LoadConfigResult {
    let config_path = get_config_path();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    AppConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (AppConfigData::default(), None)
    };

    LoadConfigResult {
        config: AppConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Move `path` to the front of `recent`, keeping at most [`MAX_RECENT_FILES`]
fn push_recent(recent: &mut Vec<PathBuf>, path: &Path) {
    recent.retain(|p| p != path);
    recent.insert(0, path.to_path_buf());
    recent.truncate(MAX_RECENT_FILES);
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create data directories: {}", e);
    }

    let result = load_config();
    config.data = result.config.data;
    config.config_path = result.config.config_path;
    config.dirty = result.config.dirty;

    // Set notification if config was reset due to an error
    if let Some(reason) = result.reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// Startup system to check that a configured favorites file still exists
fn check_favorites_file_exists(
    config: Res<AppConfig>,
    mut warning: ResMut<MissingFavoritesWarning>,
) {
    if let Some(ref path) = config.data.favorites_path
        && !path.exists()
    {
        warning.show = true;
        warning.path = Some(path.clone());
        info!("Configured favorites file no longer exists: {:?}", path);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to set the favorites file path
fn set_favorites_path_system(
    mut events: MessageReader<SetFavoritesPathRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        config.data.favorites_path = Some(event.path.clone());
        push_recent(&mut config.data.recent_favorites_files, &event.path);
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        info!("Set favorites file to {:?}", event.path);
    }
}

/// System to add a favorites file to the recent list
fn add_recent_favorites_file_system(
    mut events: MessageReader<AddRecentFavoritesFileRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.recent_favorites_files.first() == Some(&event.path) {
            continue;
        }
        push_recent(&mut config.data.recent_favorites_files, &event.path);
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<MissingFavoritesWarning>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<SetFavoritesPathRequest>()
            .add_message::<AddRecentFavoritesFileRequest>()
            .add_systems(
                Startup,
                (load_config_system, check_favorites_file_exists)
                    .chain()
                    .in_set(ConfigLoaded),
            )
            .add_systems(
                Update,
                (
                    set_favorites_path_system.run_if(on_message::<SetFavoritesPathRequest>),
                    add_recent_favorites_file_system
                        .run_if(on_message::<AddRecentFavoritesFileRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}
