mod watch;

use folder_notes_core::vault::VaultTree;
use folder_notes_core::visibility::{PresentationHook, VisibilityRule};
use folder_notes_core::{FileTree, FolderNotes, Notifier, SettingsStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct HarnessArgs {
    vault_path: PathBuf,
    settings_path: Option<PathBuf>,
    reconcile: bool,
    list: bool,
    watch: bool,
}

fn parse_args(args: &[String]) -> Result<HarnessArgs, String> {
    let mut vault_path: Option<PathBuf> = None;
    let mut settings_path: Option<PathBuf> = None;
    let mut reconcile = false;
    let mut list = false;
    let mut watch = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--vault" => {
                let value = iter.next().ok_or_else(|| "Missing --vault value".to_string())?;
                vault_path = Some(PathBuf::from(value));
            }
            "--settings" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "Missing --settings value".to_string())?;
                settings_path = Some(PathBuf::from(value));
            }
            "--reconcile" => reconcile = true,
            "--list" => list = true,
            "--watch" => watch = true,
            "--help" | "-h" => {
                return Err(String::new());
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    let vault_path = vault_path.ok_or_else(|| "Missing --vault".to_string())?;
    Ok(HarnessArgs {
        vault_path,
        settings_path,
        reconcile,
        list,
        watch,
    })
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        println!("notice: {message}");
    }
}

#[derive(Default)]
struct Listing {
    rule: Option<VisibilityRule>,
}

impl PresentationHook for Listing {
    fn register_visibility_rule(&mut self, rule: &VisibilityRule) {
        tracing::debug!(pattern = rule.pattern(), "registered visibility rule");
        self.rule = Some(rule.clone());
    }
}

impl Listing {
    fn visible(&self, tree: &impl FileTree) -> Result<Vec<String>, String> {
        let files = tree.list_all_files().map_err(|err| format!("{err:?}"))?;
        Ok(files
            .into_iter()
            .filter(|node| !self.rule.as_ref().is_some_and(|rule| rule.hides(&node.path)))
            .map(|node| node.path)
            .collect())
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    let parsed = match parse_args(&args) {
        Ok(value) => value,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprintln!("Usage: folder-notes-harness --vault <path> [--settings <json>] [--reconcile] [--list] [--watch]");
            std::process::exit(1);
        }
    };

    let store = match parsed.settings_path.clone() {
        Some(path) => SettingsStore::new(path),
        None => match SettingsStore::default_store() {
            Ok(store) => store,
            Err(err) => fail(&format!("Failed to locate settings: {err:?}")),
        },
    };
    let settings = match store.load() {
        Ok(value) => value,
        Err(err) => fail(&format!("Failed to load settings: {err:?}")),
    };

    let vault = match VaultTree::open(&parsed.vault_path) {
        Ok(value) => value,
        Err(err) => fail(&format!("Failed to open vault: {err:?}")),
    };
    let mut plugin = match FolderNotes::new(vault, settings, ConsoleNotifier) {
        Ok(value) => value,
        Err(err) => fail(&format!("Invalid settings: {err}")),
    };

    let mut listing = Listing::default();
    let loaded = match plugin.on_load(&mut listing) {
        Ok(report) => report,
        Err(err) => fail(&format!("Failed to load plugin: {err}")),
    };
    let report = match loaded {
        None if parsed.reconcile => match plugin.reconcile() {
            Ok(report) => Some(report),
            Err(err) => fail(&format!("Reconcile failed: {err}")),
        },
        other => other,
    };
    if let Some(report) = report {
        let output = serde_json::to_string_pretty(&report).unwrap_or_default();
        println!("{output}");
    }

    if parsed.list {
        match listing.visible(plugin.tree()) {
            Ok(paths) => paths.iter().for_each(|path| println!("{path}")),
            Err(message) => fail(&format!("Failed to list vault: {message}")),
        }
    }

    if parsed.watch {
        if let Err(message) = watch::watch_vault(&mut plugin) {
            fail(&format!("Watch failed: {message}"));
        }
    }
}
