pub mod error;
pub mod folder_notes;
pub mod link_sync;
pub mod links;
pub mod memory;
pub mod naming;
pub mod plugin;
pub mod reconcile;
pub mod settings;
pub mod tree;
pub mod vault;
pub mod visibility;

pub use error::FolderNoteError;
pub use plugin::{FileTreeEvents, FolderNotes, LogNotifier, Notifier};
pub use settings::{FolderNoteConfig, Settings, SettingsStore};
pub use tree::{FileNode, FileTree, NodeKind, TreeError};
