use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::DATA_FILE;

/// Events sent from the tree watcher to the host loop.
#[derive(Debug)]
pub enum TreeEvent {
    /// One or more backing files changed on disk.
    Changed(Vec<PathBuf>),
}

/// A file system watcher over the granted root tree. Only backing-file
/// creates, modifications, and removes are reported; everything a scan
/// would ignore is filtered out here too.
pub struct TreeWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<TreeEvent>,
}

impl TreeWatcher {
    /// Start watching the granted root directory recursively.
    /// Returns a `TreeWatcher` whose `poll()` method should be called each tick.
    pub fn start(root: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| {
                        p.file_name().and_then(|n| n.to_str()) == Some(DATA_FILE)
                    })
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(TreeEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(TreeWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending tree events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<TreeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}
