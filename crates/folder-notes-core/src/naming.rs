use crate::tree::{file_name, join_path, strip_extension};

pub const FOLDER_NAME_PLACEHOLDER: &str = "{{folderName}}";
pub const DEFAULT_NAMING_CONVENTION: &str = "{{folderName}}.md";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    MissingPlaceholder(String),
    MultiplePlaceholders(String),
    InvalidTemplate(String),
}

/// Substitutes the folder name into `template`. No escaping is applied.
pub fn resolve(template: &str, folder_name: &str) -> String {
    template.replacen(FOLDER_NAME_PLACEHOLDER, folder_name, 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    template: String,
}

impl NamingConvention {
    pub fn parse(template: &str) -> Result<Self, NamingError> {
        match template.matches(FOLDER_NAME_PLACEHOLDER).count() {
            0 => return Err(NamingError::MissingPlaceholder(template.to_string())),
            1 => {}
            _ => return Err(NamingError::MultiplePlaceholders(template.to_string())),
        }
        if template.contains('/') {
            return Err(NamingError::InvalidTemplate(template.to_string()));
        }
        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn file_name(&self, folder_name: &str) -> String {
        resolve(&self.template, folder_name)
    }

    pub fn note_title(&self, folder_name: &str) -> String {
        strip_extension(&self.file_name(folder_name)).to_string()
    }

    pub fn folder_note_path(&self, folder_path: &str) -> Option<String> {
        let folder_name = file_name(folder_path);
        if folder_name.is_empty() {
            return None;
        }
        Some(join_path(
            folder_path.trim_matches('/'),
            &self.file_name(folder_name),
        ))
    }

    pub fn folder_note_title(&self, folder_path: &str) -> Option<String> {
        let folder_name = file_name(folder_path);
        if folder_name.is_empty() {
            None
        } else {
            Some(self.note_title(folder_name))
        }
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            template: DEFAULT_NAMING_CONVENTION.to_string(),
        }
    }
}
