use crate::tree::{
    extension, normalize_path, validate_path, FileNode, FileTree, TreeError, NOTE_EXTENSION,
};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct VaultTree {
    root: PathBuf,
}

impl VaultTree {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, TreeError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(TreeError::NotFound(root.to_string_lossy().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn full_path(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            full.push(segment);
        }
        full
    }

    pub fn relative_path(&self, full: &Path) -> Option<String> {
        let relative = full.strip_prefix(&self.root).ok()?;
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        if segments.is_empty() || segments.iter().any(|segment| segment.starts_with('.')) {
            return None;
        }
        Some(segments.join("/"))
    }

    pub fn node_at(&self, full: &Path) -> Option<FileNode> {
        let relative = self.relative_path(full)?;
        self.exists(&relative)
    }

    fn walk(
        &self,
        dir: &Path,
        folders: &mut Vec<FileNode>,
        files: &mut Vec<FileNode>,
    ) -> Result<(), TreeError> {
        let mut entries: Vec<(PathBuf, fs::FileType)> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| Some((entry.path(), entry.file_type().ok()?)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        // Symlinks are not followed.
        for (path, file_type) in entries {
            let Some(relative) = self.relative_path(&path) else {
                continue;
            };
            if file_type.is_dir() {
                folders.push(FileNode::folder(&relative));
                self.walk(&path, folders, files)?;
            } else if file_type.is_file() && is_note_path(&relative) {
                files.push(FileNode::note(&relative));
            }
        }
        Ok(())
    }

    fn walk_all(&self) -> Result<(Vec<FileNode>, Vec<FileNode>), TreeError> {
        let mut folders = Vec::new();
        let mut files = Vec::new();
        self.walk(&self.root, &mut folders, &mut files)?;
        Ok((folders, files))
    }
}

fn is_note_path(path: &str) -> bool {
    extension(path) == Some(NOTE_EXTENSION)
}

/// Fills a freshly created file, removing it again if the write fails.
fn write_or_remove(mut file: impl Write, full: &Path, text: &str) -> Result<(), TreeError> {
    if let Err(err) = file.write_all(text.as_bytes()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(full) {
            warn!(path = %full.display(), error = %remove_err, "failed to remove partial note");
        }
        return Err(err.into());
    }
    Ok(())
}

impl FileTree for VaultTree {
    fn exists(&self, path: &str) -> Option<FileNode> {
        let path = normalize_path(path);
        if path.is_empty() {
            return None;
        }
        let metadata = fs::symlink_metadata(self.full_path(&path)).ok()?;
        if metadata.is_dir() {
            Some(FileNode::folder(&path))
        } else if metadata.is_file() && is_note_path(&path) {
            Some(FileNode::note(&path))
        } else {
            None
        }
    }

    fn read(&self, note: &FileNode) -> Result<String, TreeError> {
        match fs::read_to_string(self.full_path(&note.path)) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(TreeError::NotFound(note.path.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, note: &FileNode, text: &str) -> Result<(), TreeError> {
        let full = self.full_path(&note.path);
        if !full.is_file() {
            return Err(TreeError::NotFound(note.path.clone()));
        }
        fs::write(full, text)?;
        Ok(())
    }

    fn create(&mut self, path: &str, initial_text: &str) -> Result<FileNode, TreeError> {
        let path = normalize_path(path);
        validate_path(&path)?;
        let full = self.full_path(&path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(TreeError::AlreadyExists(path));
            }
            Err(err) => return Err(err.into()),
        };
        write_or_remove(file, &full, initial_text)?;
        Ok(FileNode::note(&path))
    }

    fn list_all_folders(&self) -> Result<Vec<FileNode>, TreeError> {
        Ok(self.walk_all()?.0)
    }

    fn list_all_files(&self) -> Result<Vec<FileNode>, TreeError> {
        Ok(self.walk_all()?.1)
    }
}
