use crate::error::FolderNoteError;
use crate::folder_notes::FolderNoteManager;
use crate::link_sync::{LinkOutcome, LinkSynchronizer};
use crate::reconcile::{reconcile_tree, ReconcileReport};
use crate::settings::{FolderNoteConfig, Settings};
use crate::tree::{FileNode, FileTree};
use crate::visibility::{PresentationHook, VisibilityRule};
use tracing::{debug, warn};

pub trait FileTreeEvents {
    fn on_create(&mut self, node: &FileNode) -> Result<(), FolderNoteError>;

    fn on_rename(&mut self, node: &FileNode, old_path: &str) -> Result<(), FolderNoteError>;
}

pub trait Notifier {
    fn notice(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notice(&self, message: &str) {
        tracing::info!(target: "folder_notes::notice", "{message}");
    }
}

pub struct FolderNotes<T, N> {
    tree: T,
    notifier: N,
    settings: Settings,
    folder_notes: FolderNoteManager,
    links: LinkSynchronizer,
    visibility: Option<VisibilityRule>,
}

impl<T: FileTree, N: Notifier> FolderNotes<T, N> {
    pub fn new(tree: T, settings: Settings, notifier: N) -> Result<Self, FolderNoteError> {
        let config = settings.config()?;
        Ok(Self {
            tree,
            notifier,
            settings,
            folder_notes: FolderNoteManager::new(config.clone()),
            links: LinkSynchronizer::new(config),
            visibility: None,
        })
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn into_tree(self) -> T {
        self.tree
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn config(&self) -> &FolderNoteConfig {
        self.folder_notes.config()
    }

    pub fn visibility_rule(&self) -> Option<&VisibilityRule> {
        self.visibility.as_ref()
    }

    pub fn on_load(
        &mut self,
        presentation: &mut dyn PresentationHook,
    ) -> Result<Option<ReconcileReport>, FolderNoteError> {
        let rule = VisibilityRule::from_convention(&self.config().naming);
        presentation.register_visibility_rule(&rule);
        self.visibility = Some(rule);

        if !self.settings.initialize_on_load {
            debug!("initialize on load disabled");
            return Ok(None);
        }
        let config = self.config().clone();
        let report = reconcile_tree(&mut self.tree, &config).inspect_err(|err| {
            warn!(error = ?err, "vault reconciliation failed");
        })?;
        if report.folder_notes_created > 0 {
            self.notifier.notice(&format!(
                "Created {} folder notes",
                report.folder_notes_created
            ));
        }
        Ok(Some(report))
    }

    /// Replaces the settings used by later events. The visibility rule keeps
    /// the convention it was derived from until the plugin is loaded again.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), FolderNoteError> {
        let config = settings.config()?;
        self.folder_notes = FolderNoteManager::new(config.clone());
        self.links = LinkSynchronizer::new(config);
        self.settings = settings;
        Ok(())
    }

    pub fn reconcile(&mut self) -> Result<ReconcileReport, FolderNoteError> {
        let config = self.config().clone();
        Ok(reconcile_tree(&mut self.tree, &config)?)
    }

    fn handle_folder_created(&mut self, folder: &FileNode) -> Result<(), FolderNoteError> {
        let outcome = self.folder_notes.ensure_folder_note(&mut self.tree, folder)?;
        if let Some(note) = outcome.note().filter(|_| outcome.created()) {
            self.notifier
                .notice(&format!("Created folder note {}", note.path));
        }
        self.folder_notes
            .link_to_parent_folder_note(&mut self.tree, folder)?;
        Ok(())
    }

    fn report_link(&self, node: &FileNode, outcome: LinkOutcome) {
        debug!(path = %node.path, ?outcome, "link sync finished");
    }
}

impl<T: FileTree, N: Notifier> FileTreeEvents for FolderNotes<T, N> {
    fn on_create(&mut self, node: &FileNode) -> Result<(), FolderNoteError> {
        let result = if node.is_folder() {
            self.handle_folder_created(node)
        } else {
            self.links
                .attach_to_parent(&mut self.tree, node)
                .map(|outcome| self.report_link(node, outcome))
                .map_err(FolderNoteError::from)
        };
        result.inspect_err(|err| warn!(path = %node.path, error = %err, "create handler failed"))
    }

    fn on_rename(&mut self, node: &FileNode, old_path: &str) -> Result<(), FolderNoteError> {
        if node.is_folder() {
            debug!(path = %node.path, old_path, "folder renames are not tracked");
            return Ok(());
        }
        self.links
            .relink(&mut self.tree, node, old_path)
            .map(|outcome| self.report_link(node, outcome))
            .map_err(FolderNoteError::from)
            .inspect_err(|err| warn!(path = %node.path, error = %err, "rename handler failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::{FileTreeEvents, FolderNotes, Notifier};
    use crate::memory::MemoryTree;
    use crate::settings::Settings;
    use crate::tree::FileNode;
    use crate::visibility::{PresentationHook, VisibilityRule};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: RefCell<Vec<String>>,
    }

    impl Notifier for &RecordingNotifier {
        fn notice(&self, message: &str) {
            self.notices.borrow_mut().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingPresentation {
        patterns: Vec<String>,
    }

    impl PresentationHook for RecordingPresentation {
        fn register_visibility_rule(&mut self, rule: &VisibilityRule) {
            self.patterns.push(rule.pattern().to_string());
        }
    }

    #[test]
    fn folder_create_event_makes_folder_note() {
        let notifier = RecordingNotifier::default();
        let mut tree = MemoryTree::new();
        let folder = tree.add_folder("Projects").expect("add folder");
        let mut plugin =
            FolderNotes::new(tree, Settings::default(), &notifier).expect("plugin");

        plugin.on_create(&folder).expect("on create");
        plugin
            .on_create(&FileNode::note("Projects/Projects.md"))
            .expect("folder note create event");

        assert_eq!(plugin.tree().content("Projects/Projects.md"), Some("# Projects"));
        assert_eq!(
            notifier.notices.borrow().as_slice(),
            ["Created folder note Projects/Projects.md"]
        );
    }

    #[test]
    fn on_load_registers_rule_and_reconciles() {
        let notifier = RecordingNotifier::default();
        let mut tree = MemoryTree::new();
        tree.add_note("A/B/note.md", "n").expect("add note");
        let mut plugin =
            FolderNotes::new(tree, Settings::default(), &notifier).expect("plugin");
        let mut presentation = RecordingPresentation::default();

        let report = plugin
            .on_load(&mut presentation)
            .expect("on load")
            .expect("report");

        assert_eq!(presentation.patterns, vec!["*.md"]);
        assert_eq!(report.folder_notes_created, 2);
        assert_eq!(plugin.tree().content("A/B/note.md"), Some("[[B]]\n\nn"));
        assert_eq!(notifier.notices.borrow().as_slice(), ["Created 2 folder notes"]);
    }

    #[test]
    fn on_load_skips_reconcile_when_disabled() {
        let notifier = RecordingNotifier::default();
        let mut tree = MemoryTree::new();
        tree.add_folder("A").expect("add folder");
        let settings = Settings {
            initialize_on_load: false,
            ..Settings::default()
        };
        let mut plugin = FolderNotes::new(tree, settings, &notifier).expect("plugin");

        let report = plugin
            .on_load(&mut RecordingPresentation::default())
            .expect("on load");
        assert!(report.is_none());
        assert!(plugin.tree().content("A/A.md").is_none());
        assert!(plugin.visibility_rule().is_some());
    }

    #[test]
    fn rule_keeps_convention_until_reload() {
        let notifier = RecordingNotifier::default();
        let mut plugin =
            FolderNotes::new(MemoryTree::new(), Settings::default(), &notifier).expect("plugin");
        plugin
            .on_load(&mut RecordingPresentation::default())
            .expect("on load");

        plugin
            .apply_settings(Settings {
                folder_note_naming_convention: "_{{folderName}}.md".to_string(),
                ..Settings::default()
            })
            .expect("apply settings");

        let folder = plugin.tree_mut().add_folder("Work").expect("add folder");
        plugin.on_create(&folder).expect("on create");
        assert_eq!(plugin.tree().content("Work/_Work.md"), Some("# Work"));
        assert_eq!(
            plugin.visibility_rule().map(|rule| rule.pattern()),
            Some("*.md")
        );
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let notifier = RecordingNotifier::default();
        let settings = Settings {
            folder_note_naming_convention: "notes.md".to_string(),
            ..Settings::default()
        };
        assert!(FolderNotes::new(MemoryTree::new(), settings, &notifier).is_err());
    }

    #[test]
    fn create_failures_reach_the_host() {
        let notifier = RecordingNotifier::default();
        let settings = Settings {
            folder_note_naming_convention: "{{folderName}}|.md".to_string(),
            ..Settings::default()
        };
        let mut tree = MemoryTree::new();
        let folder = tree.add_folder("Projects").expect("add folder");
        let mut plugin = FolderNotes::new(tree, settings, &notifier).expect("plugin");

        let error = plugin.on_create(&folder).err().expect("create should fail");
        assert!(error.to_string().contains("invalid file name"));
        assert!(notifier.notices.borrow().is_empty());
    }
}
