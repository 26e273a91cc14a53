pub const NOTE_EXTENSION: &str = "md";

const ILLEGAL_NAME_CHARS: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug)]
pub enum TreeError {
    AlreadyExists(String),
    InvalidName(String),
    NotFound(String),
    Io(std::io::Error),
}

impl From<std::io::Error> for TreeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
}

impl FileNode {
    pub fn folder(path: &str) -> Self {
        Self::new(path, NodeKind::Folder)
    }

    pub fn note(path: &str) -> Self {
        Self::new(path, NodeKind::Note)
    }

    fn new(path: &str, kind: NodeKind) -> Self {
        let path = normalize_path(path);
        Self {
            name: file_name(&path).to_string(),
            path,
            kind,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder)
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == NodeKind::Note && extension(&self.name) == Some(NOTE_EXTENSION)
    }

    pub fn basename(&self) -> &str {
        strip_extension(&self.name)
    }

    pub fn parent(&self) -> Option<&str> {
        parent_path(&self.path)
    }

    pub fn depth(&self) -> usize {
        path_depth(&self.path)
    }
}

pub trait FileTree {
    fn exists(&self, path: &str) -> Option<FileNode>;

    fn read(&self, note: &FileNode) -> Result<String, TreeError>;

    fn write(&mut self, note: &FileNode, text: &str) -> Result<(), TreeError>;

    /// Creates a note. Fails with `AlreadyExists` when the path is taken and
    /// `InvalidName` when the path cannot name a file.
    fn create(&mut self, path: &str, initial_text: &str) -> Result<FileNode, TreeError>;

    fn list_all_folders(&self) -> Result<Vec<FileNode>, TreeError>;

    fn list_all_files(&self) -> Result<Vec<FileNode>, TreeError>;
}

pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_matches('/');
    trimmed.rsplit_once('/').map(|(parent, _)| parent)
}

pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_matches('/');
    trimmed
        .rsplit_once('/')
        .map(|(_, name)| name)
        .unwrap_or(trimmed)
}

pub fn path_depth(path: &str) -> usize {
    path.split('/').filter(|segment| !segment.is_empty()).count()
}

pub fn extension(name: &str) -> Option<&str> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => Some(ext),
        _ => None,
    }
}

pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

pub fn validate_path(path: &str) -> Result<(), TreeError> {
    if path.is_empty() {
        return Err(TreeError::InvalidName(path.to_string()));
    }
    for segment in path.split('/') {
        let invalid = segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.trim().is_empty()
            || segment.contains(ILLEGAL_NAME_CHARS);
        if invalid {
            return Err(TreeError::InvalidName(path.to_string()));
        }
    }
    Ok(())
}
