use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;

use docwatch::engine::{RuntimeEvent, WatchChannel};
use docwatch::watch::{self, WatchProfiles};
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn file_writes_surface_as_change_events() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let root = dir.path().canonicalize().unwrap();
    fs::create_dir_all(root.join("src/definitions/elements")).unwrap();

    let cfg = ConfigFileBuilder::new().build();
    let profiles = WatchProfiles::from_config(&cfg).unwrap();
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let _watcher = watch::spawn(root.clone(), profiles, event_tx).unwrap();

    // Let the recursive registration settle before the write.
    tokio::time::sleep(Duration::from_millis(200)).await;
    fs::write(
        root.join("src/definitions/elements/button.less"),
        ".button {}",
    )
    .unwrap();

    let expected = PathBuf::from("src/definitions/elements/button.less");
    let mut channels = Vec::new();
    with_timeout(async {
        while let Some(event) = event_rx.recv().await {
            if let RuntimeEvent::ChangeDetected { channel, path } = event {
                if path == expected && !channels.contains(&channel) {
                    channels.push(channel);
                }
                if channels.contains(&WatchChannel::SourceMirror)
                    && channels.contains(&WatchChannel::Styles)
                {
                    break;
                }
            }
        }
    })
    .await;

    // A definition write feeds both the mirror and the style pipeline.
    assert!(channels.contains(&WatchChannel::SourceMirror));
    assert!(channels.contains(&WatchChannel::Styles));
}
