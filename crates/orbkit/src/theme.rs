use fs_err as fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Anything other than `light` reads as dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to persist theme: {0}")]
    Io(#[from] std::io::Error),
}

/// The persisted theme flag: a single string in a file.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(flag) => Theme::from_flag(Some(&flag)),
            Err(e) if e.kind() == ErrorKind::NotFound => Theme::default(),
            Err(e) => {
                log::warn!("Failed to read theme flag: {}", e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, theme.to_string())?;
        Ok(())
    }
}
