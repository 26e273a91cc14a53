use folder_notes_core::vault::VaultTree;
use folder_notes_core::{FileNode, FileTreeEvents, FolderNotes, Notifier};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    Created(FileNode),
    Renamed { node: FileNode, old_path: String },
}

/// Maps a raw watcher event onto the events the plugin handles.
///
/// Only paired renames are forwarded; the separate from/to halves some
/// platforms emit would otherwise be handled twice.
pub fn translate(vault: &VaultTree, event: &Event) -> Vec<TreeEvent> {
    match &event.kind {
        EventKind::Create(_) => event
            .paths
            .iter()
            .filter_map(|path| vault.node_at(path))
            .map(TreeEvent::Created)
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if event.paths.len() >= 2 => {
            let old_path = vault.relative_path(&event.paths[0]);
            let node = vault.node_at(&event.paths[1]);
            match (node, old_path) {
                (Some(node), Some(old_path)) => vec![TreeEvent::Renamed { node, old_path }],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

pub fn dispatch<N: Notifier>(plugin: &mut FolderNotes<VaultTree, N>, event: TreeEvent) {
    let result = match &event {
        TreeEvent::Created(node) => plugin.on_create(node),
        TreeEvent::Renamed { node, old_path } => plugin.on_rename(node, old_path),
    };
    if let Err(err) = result {
        eprintln!("Failed to handle {event:?}: {err}");
    }
}

/// Blocks, feeding filesystem events to the plugin one at a time.
pub fn watch_vault<N: Notifier>(plugin: &mut FolderNotes<VaultTree, N>) -> Result<(), String> {
    let root = plugin.tree().root().to_path_buf();
    let (event_tx, event_rx) = mpsc::channel::<Event>();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let _ = event_tx.send(event);
            }
            Err(err) => warn!(error = %err, "watch error"),
        },
        Config::default(),
    )
    .map_err(|err| format!("{err}"))?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|err| format!("{err}"))?;
    info!(root = %root.display(), "watching vault");

    for event in event_rx {
        for tree_event in translate(plugin.tree(), &event) {
            dispatch(plugin, tree_event);
        }
    }
    Ok(())
}
