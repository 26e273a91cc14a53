use crate::folder_notes::FolderNoteManager;
use crate::links::prepend_link;
use crate::settings::FolderNoteConfig;
use crate::tree::{parent_path, FileNode, FileTree, TreeError};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    Added,
    Replaced,
    AlreadyLinked,
    NotLinked,
    NoParent,
    NoFolderNote,
    Unchanged,
    NotApplicable,
}

impl LinkOutcome {
    pub fn changed(self) -> bool {
        matches!(self, LinkOutcome::Added | LinkOutcome::Replaced)
    }
}

pub struct LinkSynchronizer {
    folder_notes: FolderNoteManager,
}

impl LinkSynchronizer {
    pub fn new(config: FolderNoteConfig) -> Self {
        Self {
            folder_notes: FolderNoteManager::new(config),
        }
    }

    fn config(&self) -> &FolderNoteConfig {
        self.folder_notes.config()
    }

    pub fn attach_to_parent<T: FileTree + ?Sized>(
        &self,
        tree: &mut T,
        note: &FileNode,
    ) -> Result<LinkOutcome, TreeError> {
        if !note.is_markdown() {
            return Ok(LinkOutcome::NotApplicable);
        }
        let Some(parent) = note.parent() else {
            return Ok(LinkOutcome::NoParent);
        };
        let Some(folder_note) = self.folder_notes.find_folder_note(&*tree, parent) else {
            debug!(note = %note.path, "parent folder has no folder note");
            return Ok(LinkOutcome::NoFolderNote);
        };
        if folder_note.path == note.path {
            return Ok(LinkOutcome::NotApplicable);
        }

        let title = folder_note.basename();
        let content = tree.read(note)?;
        if self.config().link_match.has_link(&content, title) {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        tree.write(note, &prepend_link(&content, title))?;
        info!(note = %note.path, parent = %title, "linked note to folder note");
        Ok(LinkOutcome::Added)
    }

    pub fn relink<T: FileTree + ?Sized>(
        &self,
        tree: &mut T,
        note: &FileNode,
        old_path: &str,
    ) -> Result<LinkOutcome, TreeError> {
        if !note.is_markdown() {
            return Ok(LinkOutcome::NotApplicable);
        }
        let (Some(old_parent), Some(new_parent)) = (parent_path(old_path), note.parent()) else {
            return Ok(LinkOutcome::NoParent);
        };
        if old_parent == new_parent {
            return Ok(LinkOutcome::Unchanged);
        }
        let Some(folder_note) = self.folder_notes.find_folder_note(&*tree, new_parent) else {
            debug!(note = %note.path, "new parent folder has no folder note");
            return Ok(LinkOutcome::NoFolderNote);
        };
        if folder_note.path == note.path {
            return Ok(LinkOutcome::NotApplicable);
        }
        let Some(old_title) = self.config().naming.folder_note_title(old_parent) else {
            return Ok(LinkOutcome::NoParent);
        };
        let new_title = folder_note.basename();

        let link_match = self.config().link_match;
        let content = tree.read(note)?;
        if !link_match.has_link(&content, &old_title) {
            debug!(note = %note.path, old = %old_title, "note was not linked to its old parent");
            return Ok(LinkOutcome::NotLinked);
        }
        tree.write(note, &link_match.replace_link(&content, &old_title, new_title))?;
        info!(note = %note.path, from = %old_title, to = %new_title, "relinked moved note");
        Ok(LinkOutcome::Replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::{LinkOutcome, LinkSynchronizer};
    use crate::memory::MemoryTree;
    use crate::settings::FolderNoteConfig;
    use crate::tree::FileNode;

    fn synchronizer() -> LinkSynchronizer {
        LinkSynchronizer::new(FolderNoteConfig::default())
    }

    fn projects_tree() -> MemoryTree {
        let mut tree = MemoryTree::new();
        tree.add_note("Projects/Projects.md", "# Projects")
            .expect("add folder note");
        tree
    }

    #[test]
    fn attach_prepends_parent_link() {
        let mut tree = projects_tree();
        let note = tree
            .add_note("Projects/todo.md", "- buy milk")
            .expect("add note");

        let outcome = synchronizer()
            .attach_to_parent(&mut tree, &note)
            .expect("attach");
        assert_eq!(outcome, LinkOutcome::Added);
        assert_eq!(
            tree.content("Projects/todo.md"),
            Some("[[Projects]]\n\n- buy milk")
        );

        let again = synchronizer()
            .attach_to_parent(&mut tree, &note)
            .expect("attach");
        assert_eq!(again, LinkOutcome::AlreadyLinked);
    }

    #[test]
    fn attach_skips_missing_folder_note_and_self() {
        let mut tree = projects_tree();
        let orphan = tree.add_note("Inbox/idea.md", "idea").expect("add note");
        let root_note = tree.add_note("readme.md", "root").expect("add note");
        let folder_note = FileNode::note("Projects/Projects.md");
        let sync = synchronizer();

        assert_eq!(
            sync.attach_to_parent(&mut tree, &orphan).expect("attach"),
            LinkOutcome::NoFolderNote
        );
        assert_eq!(
            sync.attach_to_parent(&mut tree, &root_note).expect("attach"),
            LinkOutcome::NoParent
        );
        assert_eq!(
            sync.attach_to_parent(&mut tree, &folder_note)
                .expect("attach"),
            LinkOutcome::NotApplicable
        );
        assert_eq!(tree.content("Inbox/idea.md"), Some("idea"));
        assert_eq!(tree.content("Projects/Projects.md"), Some("# Projects"));
    }

    #[test]
    fn relink_follows_move() {
        let mut tree = projects_tree();
        tree.add_note("Archive/Archive.md", "# Archive")
            .expect("add folder note");
        tree.add_note("Projects/todo.md", "[[Projects]]\n\ntodo")
            .expect("add note");
        let moved = tree
            .rename("Projects/todo.md", "Archive/todo.md")
            .expect("rename");

        let outcome = synchronizer()
            .relink(&mut tree, &moved, "Projects/todo.md")
            .expect("relink");
        assert_eq!(outcome, LinkOutcome::Replaced);
        assert_eq!(tree.content("Archive/todo.md"), Some("[[Archive]]\n\ntodo"));
    }

    #[test]
    fn relink_without_target_folder_note_is_noop() {
        let mut tree = projects_tree();
        tree.add_note("Projects/todo.md", "[[Projects]]\n\ntodo")
            .expect("add note");
        tree.add_folder("Someday").expect("add folder");
        let moved = tree
            .rename("Projects/todo.md", "Someday/todo.md")
            .expect("rename");

        let outcome = synchronizer()
            .relink(&mut tree, &moved, "Projects/todo.md")
            .expect("relink");
        assert_eq!(outcome, LinkOutcome::NoFolderNote);
        assert_eq!(
            tree.content("Someday/todo.md"),
            Some("[[Projects]]\n\ntodo")
        );
    }

    #[test]
    fn relink_never_links_unlinked_note() {
        let mut tree = projects_tree();
        tree.add_note("Archive/Archive.md", "# Archive")
            .expect("add folder note");
        tree.add_note("Projects/todo.md", "todo").expect("add note");
        let moved = tree
            .rename("Projects/todo.md", "Archive/todo.md")
            .expect("rename");

        let outcome = synchronizer()
            .relink(&mut tree, &moved, "Projects/todo.md")
            .expect("relink");
        assert_eq!(outcome, LinkOutcome::NotLinked);
        assert_eq!(tree.content("Archive/todo.md"), Some("todo"));
    }

    #[test]
    fn relink_ignores_root_moves_and_renames_in_place() {
        let mut tree = projects_tree();
        tree.add_note("Projects/todo.md", "[[Projects]]\n\ntodo")
            .expect("add note");
        let renamed = tree
            .rename("Projects/todo.md", "Projects/done.md")
            .expect("rename");
        let sync = synchronizer();

        assert_eq!(
            sync.relink(&mut tree, &renamed, "Projects/todo.md")
                .expect("relink"),
            LinkOutcome::Unchanged
        );

        let at_root = tree.rename("Projects/done.md", "done.md").expect("rename");
        assert_eq!(
            sync.relink(&mut tree, &at_root, "Projects/done.md")
                .expect("relink"),
            LinkOutcome::NoParent
        );
        assert_eq!(tree.content("done.md"), Some("[[Projects]]\n\ntodo"));
    }
}
