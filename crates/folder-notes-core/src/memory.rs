use crate::tree::{
    normalize_path, parent_path, validate_path, FileNode, FileTree, NodeKind, TreeError,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Entry {
    Folder,
    Note(String),
}

/// A file tree held entirely in memory. Useful for hosts that keep their own
/// storage and for exercising the plugin without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    entries: BTreeMap<String, Entry>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&mut self, path: &str) -> Result<FileNode, TreeError> {
        let path = normalize_path(path);
        validate_path(&path)?;
        let mut current = String::new();
        for segment in path.split('/') {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);
            match self.entries.get(&current) {
                Some(Entry::Note(_)) => return Err(TreeError::AlreadyExists(current)),
                Some(Entry::Folder) => {}
                None => {
                    self.entries.insert(current.clone(), Entry::Folder);
                }
            }
        }
        Ok(FileNode::folder(&path))
    }

    pub fn add_note(&mut self, path: &str, text: &str) -> Result<FileNode, TreeError> {
        let path = normalize_path(path);
        validate_path(&path)?;
        if let Some(parent) = parent_path(&path) {
            self.add_folder(parent)?;
        }
        if matches!(self.entries.get(&path), Some(Entry::Folder)) {
            return Err(TreeError::AlreadyExists(path));
        }
        self.entries.insert(path.clone(), Entry::Note(text.to_string()));
        Ok(FileNode::note(&path))
    }

    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<FileNode, TreeError> {
        let old_path = normalize_path(old_path);
        let new_path = normalize_path(new_path);
        validate_path(&new_path)?;
        if self.entries.contains_key(&new_path) {
            return Err(TreeError::AlreadyExists(new_path));
        }
        let text = match self.entries.get(&old_path) {
            Some(Entry::Note(text)) => text.clone(),
            Some(Entry::Folder) => return Err(TreeError::InvalidName(old_path)),
            None => return Err(TreeError::NotFound(old_path)),
        };
        let node = self.add_note(&new_path, &text)?;
        self.entries.remove(&old_path);
        Ok(node)
    }

    pub fn content(&self, path: &str) -> Option<&str> {
        match self.entries.get(&normalize_path(path)) {
            Some(Entry::Note(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn list(&self, kind: NodeKind) -> Vec<FileNode> {
        self.entries
            .iter()
            .filter_map(|(path, entry)| match (entry, kind) {
                (Entry::Folder, NodeKind::Folder) => Some(FileNode::folder(path)),
                (Entry::Note(_), NodeKind::Note) => Some(FileNode::note(path)),
                _ => None,
            })
            .collect()
    }
}

impl FileTree for MemoryTree {
    fn exists(&self, path: &str) -> Option<FileNode> {
        let path = normalize_path(path);
        match self.entries.get(&path)? {
            Entry::Folder => Some(FileNode::folder(&path)),
            Entry::Note(_) => Some(FileNode::note(&path)),
        }
    }

    fn read(&self, note: &FileNode) -> Result<String, TreeError> {
        self.content(&note.path)
            .map(str::to_string)
            .ok_or_else(|| TreeError::NotFound(note.path.clone()))
    }

    fn write(&mut self, note: &FileNode, text: &str) -> Result<(), TreeError> {
        match self.entries.get_mut(&note.path) {
            Some(Entry::Note(content)) => {
                *content = text.to_string();
                Ok(())
            }
            _ => Err(TreeError::NotFound(note.path.clone())),
        }
    }

    fn create(&mut self, path: &str, initial_text: &str) -> Result<FileNode, TreeError> {
        let path = normalize_path(path);
        validate_path(&path)?;
        if self.entries.contains_key(&path) {
            return Err(TreeError::AlreadyExists(path));
        }
        if let Some(parent) = parent_path(&path) {
            if !matches!(self.entries.get(parent), Some(Entry::Folder)) {
                return Err(TreeError::NotFound(parent.to_string()));
            }
        }
        self.entries
            .insert(path.clone(), Entry::Note(initial_text.to_string()));
        Ok(FileNode::note(&path))
    }

    fn list_all_folders(&self) -> Result<Vec<FileNode>, TreeError> {
        Ok(self.list(NodeKind::Folder))
    }

    fn list_all_files(&self) -> Result<Vec<FileNode>, TreeError> {
        Ok(self.list(NodeKind::Note))
    }
}
