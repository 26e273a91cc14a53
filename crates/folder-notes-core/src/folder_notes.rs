use crate::link_sync::LinkOutcome;
use crate::links::prepend_link;
use crate::settings::FolderNoteConfig;
use crate::tree::{parent_path, FileNode, FileTree, TreeError};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    Created(FileNode),
    AlreadyExists(FileNode),
    Skipped,
}

impl EnsureOutcome {
    pub fn created(&self) -> bool {
        matches!(self, EnsureOutcome::Created(_))
    }

    pub fn note(&self) -> Option<&FileNode> {
        match self {
            EnsureOutcome::Created(note) | EnsureOutcome::AlreadyExists(note) => Some(note),
            EnsureOutcome::Skipped => None,
        }
    }
}

pub fn folder_note_heading(folder_name: &str) -> String {
    format!("# {folder_name}")
}

pub struct FolderNoteManager {
    config: FolderNoteConfig,
}

impl FolderNoteManager {
    pub fn new(config: FolderNoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FolderNoteConfig {
        &self.config
    }

    pub fn folder_note_path(&self, folder: &FileNode) -> Option<String> {
        self.config.naming.folder_note_path(&folder.path)
    }

    pub fn find_folder_note<T: FileTree + ?Sized>(
        &self,
        tree: &T,
        folder_path: &str,
    ) -> Option<FileNode> {
        let path = self.config.naming.folder_note_path(folder_path)?;
        tree.exists(&path).filter(|node| !node.is_folder())
    }

    pub fn ensure_folder_note<T: FileTree + ?Sized>(
        &self,
        tree: &mut T,
        folder: &FileNode,
    ) -> Result<EnsureOutcome, TreeError> {
        let Some(path) = self.folder_note_path(folder) else {
            return Ok(EnsureOutcome::Skipped);
        };
        if let Some(existing) = tree.exists(&path) {
            debug!(path = %path, "folder note already exists");
            return Ok(EnsureOutcome::AlreadyExists(existing));
        }

        match tree.create(&path, &folder_note_heading(&folder.name)) {
            Ok(note) => {
                info!(path = %note.path, "created folder note");
                Ok(EnsureOutcome::Created(note))
            }
            Err(TreeError::AlreadyExists(_)) => {
                debug!(path = %path, "folder note created concurrently");
                Ok(EnsureOutcome::AlreadyExists(FileNode::note(&path)))
            }
            Err(err) => Err(err),
        }
    }

    pub fn link_to_parent_folder_note<T: FileTree + ?Sized>(
        &self,
        tree: &mut T,
        folder: &FileNode,
    ) -> Result<LinkOutcome, TreeError> {
        let Some(parent) = parent_path(&folder.path) else {
            return Ok(LinkOutcome::NoParent);
        };
        let Some(parent_title) = self.config.naming.folder_note_title(parent) else {
            return Ok(LinkOutcome::NoParent);
        };
        if self.find_folder_note(&*tree, parent).is_none() {
            return Ok(LinkOutcome::NoFolderNote);
        }
        let Some(own_note) = self.find_folder_note(&*tree, &folder.path) else {
            return Ok(LinkOutcome::NoFolderNote);
        };

        let content = tree.read(&own_note)?;
        if self.config.link_match.has_link(&content, &parent_title) {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        tree.write(&own_note, &prepend_link(&content, &parent_title))?;
        info!(note = %own_note.path, parent = %parent_title, "linked folder note to parent");
        Ok(LinkOutcome::Added)
    }
}
