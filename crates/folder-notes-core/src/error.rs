use crate::naming::NamingError;
use crate::settings::SettingsError;
use crate::tree::TreeError;
use std::fmt;

#[derive(Debug)]
pub enum FolderNoteError {
    Tree(TreeError),
    Naming(NamingError),
    Settings(SettingsError),
}

impl From<TreeError> for FolderNoteError {
    fn from(err: TreeError) -> Self {
        Self::Tree(err)
    }
}

impl From<NamingError> for FolderNoteError {
    fn from(err: NamingError) -> Self {
        Self::Naming(err)
    }
}

impl From<SettingsError> for FolderNoteError {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

fn write_naming(f: &mut fmt::Formatter<'_>, err: &NamingError) -> fmt::Result {
    match err {
        NamingError::MissingPlaceholder(template) => {
            write!(f, "naming convention {template:?} has no {{{{folderName}}}}")
        }
        NamingError::MultiplePlaceholders(template) => write!(
            f,
            "naming convention {template:?} repeats {{{{folderName}}}}"
        ),
        NamingError::InvalidTemplate(template) => {
            write!(f, "naming convention {template:?} is not a file name")
        }
    }
}

impl fmt::Display for FolderNoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree(TreeError::AlreadyExists(path)) => write!(f, "{path} already exists"),
            Self::Tree(TreeError::InvalidName(path)) => write!(f, "invalid file name: {path}"),
            Self::Tree(TreeError::NotFound(path)) => write!(f, "{path} not found"),
            Self::Tree(TreeError::Io(err)) => write!(f, "file tree error: {err}"),
            Self::Naming(err) => write_naming(f, err),
            Self::Settings(SettingsError::Io(err)) => write!(f, "settings file error: {err}"),
            Self::Settings(SettingsError::Serde(err)) => {
                write!(f, "settings are not valid JSON: {err}")
            }
            Self::Settings(SettingsError::Naming(err)) => write_naming(f, err),
            Self::Settings(SettingsError::ProjectDir) => {
                write!(f, "no settings directory is available")
            }
        }
    }
}

impl std::error::Error for FolderNoteError {}

#[cfg(test)]
mod tests {
    use super::FolderNoteError;
    use crate::naming::NamingError;
    use crate::settings::SettingsError;

    #[test]
    fn settings_errors_read_as_sentences() {
        let naming = FolderNoteError::from(SettingsError::Naming(NamingError::MissingPlaceholder(
            "notes.md".to_string(),
        )));
        assert_eq!(
            naming.to_string(),
            "naming convention \"notes.md\" has no {{folderName}}"
        );

        let missing_dir = FolderNoteError::from(SettingsError::ProjectDir);
        assert_eq!(missing_dir.to_string(), "no settings directory is available");

        let json = serde_json::from_str::<serde_json::Value>("{").expect_err("bad json");
        let message = FolderNoteError::from(SettingsError::from(json)).to_string();
        assert!(message.starts_with("settings are not valid JSON: "));
        assert!(!message.contains("Serde("));
    }
}
