// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::route::rel_str;

use super::profiles::WatchProfiles;

/// Handle keeping the underlying `notify` watcher alive.
///
/// Dropping this stops the watch.
#[derive(Debug)]
pub struct ChangeWatcher {
    _watcher: RecommendedWatcher,
}

/// Start watching `root` recursively and feed matching changes into the
/// runtime as `ChangeDetected` events.
///
/// The `notify` callback runs on its own thread, so raw events hop through
/// an unbounded channel into an async forwarding task.
pub fn spawn(
    root: PathBuf,
    profiles: WatchProfiles,
    event_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<ChangeWatcher> {
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = raw_tx.send(res);
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(root = %root.display(), "watching source tree");

    tokio::spawn(async move {
        while let Some(res) = raw_rx.recv().await {
            match res {
                Ok(event) => forward_event(&root, &profiles, &event_tx, event).await,
                Err(e) => warn!(error = %e, "watch error"),
            }
        }
        debug!("watch channel closed; forwarder exiting");
    });

    Ok(ChangeWatcher { _watcher: watcher })
}

/// Forward one raw notify event through the glob profiles.
async fn forward_event(
    root: &Path,
    profiles: &WatchProfiles,
    event_tx: &mpsc::Sender<RuntimeEvent>,
    event: Event,
) {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }

    for path in event.paths {
        // notify reports absolute paths; profiles match relative ones.
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel = rel.to_path_buf();
        let rel_s = rel_str(&rel);

        for channel in profiles.channels_for(&rel_s) {
            debug!(path = %rel_s, ?channel, "change matched watch profile");
            let _ = event_tx
                .send(RuntimeEvent::ChangeDetected {
                    channel,
                    path: rel.clone(),
                })
                .await;
        }
    }
}
