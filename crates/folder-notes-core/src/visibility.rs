use crate::naming::{NamingConvention, FOLDER_NAME_PLACEHOLDER};
use crate::tree::{file_name, parent_path};

pub const WILDCARD: &str = "*";

/// Rule a presentation layer uses to hide folder notes from a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityRule {
    pattern: String,
    prefix: String,
    suffix: String,
}

impl VisibilityRule {
    pub fn from_convention(naming: &NamingConvention) -> Self {
        let template = naming.template();
        let (prefix, suffix) = template
            .split_once(FOLDER_NAME_PLACEHOLDER)
            .unwrap_or((template, ""));
        Self {
            pattern: format!("{prefix}{WILDCARD}{suffix}"),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn capture<'a>(&self, name: &'a str) -> Option<&'a str> {
        if name.len() < self.prefix.len() + self.suffix.len() {
            return None;
        }
        name.strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.capture(name).is_some_and(|folder| !folder.is_empty())
    }

    pub fn hides(&self, path: &str) -> bool {
        let Some(parent) = parent_path(path) else {
            return false;
        };
        self.capture(file_name(path)) == Some(file_name(parent))
    }
}

pub trait PresentationHook {
    fn register_visibility_rule(&mut self, rule: &VisibilityRule);
}
