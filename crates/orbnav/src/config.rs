use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbkit::{
    IdleMotion, LayoutParams, MotionParams, MotionParamsError, NavEntry, NavTable, OrbSizes,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub idle: IdleMotion,
    #[serde(default)]
    pub motion: MotionParams,
    #[serde(default)]
    pub layout: LayoutParams,
    #[serde(default)]
    pub orbs: OrbSizes,
    #[serde(default)]
    pub center: Option<NavEntry>,
    #[serde(default)]
    pub nav: Vec<NavEntry>,
}

impl Config {
    /// Navigation table with built-in entries filling whatever the file leaves out.
    pub fn nav_table(&self) -> NavTable {
        let defaults = NavTable::default();
        NavTable {
            center: self.center.clone().unwrap_or(defaults.center),
            entries: if self.nav.is_empty() {
                defaults.entries
            } else {
                self.nav.clone()
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid motion settings: {0}")]
    Invalid(#[from] MotionParamsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("org", "orbnav", "orbnav").ok_or(ConfigError::ConfigDirNotFound)
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

pub fn get_theme_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.data_dir().join("theme"))
}

fn build(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(file.required(false))
        .add_source(
            config::Environment::with_prefix("ORBNAV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.motion.validate()?;
    Ok(config)
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path))
}

pub fn load_or_default(path: &Path) -> Config {
    load_from(path).unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        Config::default()
    })
}

/// Writes the commented default config to `path` unless a file is already there.
/// Returns whether a file was written.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    log::info!("Wrote default configuration to {}", path.display());
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn touches(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>, config_path: PathBuf) {
    if let Err(e) = watch(tx, config_path).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch(tx: Sender<AppEvent>, config_path: PathBuf) -> Result<(), ConfigError> {
    let Some(config_dir) = config_path.parent().map(Path::to_path_buf) else {
        return Ok(());
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return Ok(());
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if touches(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}
