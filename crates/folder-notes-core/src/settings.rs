use crate::links::LinkMatch;
use crate::naming::{NamingConvention, NamingError, DEFAULT_NAMING_CONVENTION};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Naming(NamingError),
    ProjectDir,
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl From<NamingError> for SettingsError {
    fn from(err: NamingError) -> Self {
        Self::Naming(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub initialize_on_load: bool,
    pub folder_note_naming_convention: String,
    pub strict_link_matching: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initialize_on_load: true,
            folder_note_naming_convention: DEFAULT_NAMING_CONVENTION.to_string(),
            strict_link_matching: false,
        }
    }
}

impl Settings {
    pub fn config(&self) -> Result<FolderNoteConfig, NamingError> {
        Ok(FolderNoteConfig {
            naming: NamingConvention::parse(&self.folder_note_naming_convention)?,
            link_match: if self.strict_link_matching {
                LinkMatch::Exact
            } else {
                LinkMatch::Substring
            },
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderNoteConfig {
    pub naming: NamingConvention,
    pub link_match: LinkMatch,
}

pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    pub fn default_store() -> Result<Self, SettingsError> {
        let project_dirs = ProjectDirs::from("app", "folder-notes", "FolderNotes")
            .ok_or(SettingsError::ProjectDir)?;
        Ok(Self::new(project_dirs.config_dir().join("settings.json")))
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn load(&self) -> Result<Settings, SettingsError> {
        if !self.settings_path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.settings_path)?;
        let settings: Settings = serde_json::from_str(&raw)?;
        settings.config()?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.config()?;
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(settings)?;
        fs::write(&self.settings_path, data)?;
        Ok(())
    }
}
