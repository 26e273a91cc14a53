use crate::folder_notes::FolderNoteManager;
use crate::link_sync::LinkSynchronizer;
use crate::settings::FolderNoteConfig;
use crate::tree::{FileNode, FileTree, TreeError};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub folders_visited: usize,
    pub folder_notes_created: usize,
    pub folder_links_added: usize,
    pub note_links_added: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.folder_notes_created + self.folder_links_added + self.note_links_added > 0
    }
}

/// Orders folders so every parent comes before its children.
pub fn sort_shallow_to_deep(folders: &mut [FileNode]) {
    folders.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.path.cmp(&b.path)));
}

pub fn reconcile_all<T: FileTree + ?Sized>(
    tree: &mut T,
    config: &FolderNoteConfig,
    mut folders: Vec<FileNode>,
    files: Vec<FileNode>,
) -> Result<ReconcileReport, TreeError> {
    let folder_notes = FolderNoteManager::new(config.clone());
    let links = LinkSynchronizer::new(config.clone());
    let mut report = ReconcileReport::default();

    sort_shallow_to_deep(&mut folders);
    for folder in folders.iter().filter(|node| node.is_folder()) {
        report.folders_visited += 1;
        if folder_notes.ensure_folder_note(tree, folder)?.created() {
            report.folder_notes_created += 1;
        }
        if folder_notes
            .link_to_parent_folder_note(tree, folder)?
            .changed()
        {
            report.folder_links_added += 1;
        }
    }

    for note in files.iter().filter(|node| node.is_markdown()) {
        if links.attach_to_parent(tree, note)?.changed() {
            report.note_links_added += 1;
        }
    }

    info!(
        folders = report.folders_visited,
        created = report.folder_notes_created,
        folder_links = report.folder_links_added,
        note_links = report.note_links_added,
        "reconciled vault"
    );
    Ok(report)
}

pub fn reconcile_tree<T: FileTree + ?Sized>(
    tree: &mut T,
    config: &FolderNoteConfig,
) -> Result<ReconcileReport, TreeError> {
    let folders = tree.list_all_folders()?;
    let files = tree.list_all_files()?;
    reconcile_all(tree, config, folders, files)
}
