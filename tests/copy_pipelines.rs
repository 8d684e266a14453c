use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use docwatch::config::ConfigFile;
use docwatch::engine::BuildOutcome;
use docwatch::fs::mock::MockFileSystem;
use docwatch::pipeline::{assets, mirror, BuildContext};
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::fakes::FakeToolchain;
use docwatch_test_utils::init_tracing;

fn context(cfg: ConfigFile, fs: MockFileSystem) -> BuildContext {
    let (event_tx, _event_rx) = mpsc::channel(64);
    // Receiver is dropped; copies never send events.
    BuildContext {
        config: Arc::new(cfg),
        fs: Arc::new(fs),
        tools: Arc::new(FakeToolchain::new()),
        event_tx,
    }
}

#[tokio::test]
async fn asset_copy_preserves_the_path_below_the_themes_root() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("src/themes/default/assets/images/button.png", &b"\x89PNG"[..]);
    let ctx = context(ConfigFileBuilder::new().build(), fs.clone());

    let outcome = assets::copy_asset(
        &ctx,
        Path::new("src/themes/default/assets/images/button.png"),
    )
    .await
    .unwrap();

    assert_eq!(outcome, BuildOutcome::Success);
    assert!(fs
        .contents("docs/build/themes/default/assets/images/button.png")
        .is_some());
}

#[tokio::test]
async fn asset_copy_stamps_permissions() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().with_permission("644").build();
    let fs = MockFileSystem::new();
    fs.add_file("src/themes/default/assets/fonts/icons.woff2", "font");
    let ctx = context(cfg, fs.clone());

    assets::copy_asset(&ctx, Path::new("src/themes/default/assets/fonts/icons.woff2"))
        .await
        .unwrap();

    assert_eq!(
        fs.mode_of("docs/build/themes/default/assets/fonts/icons.woff2"),
        Some(0o644)
    );
}

#[tokio::test]
async fn mirror_copies_verbatim_under_the_mirror_root() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("src/definitions/elements/button.less", ".button {}");
    let ctx = context(ConfigFileBuilder::new().build(), fs.clone());

    let outcome = mirror::mirror_file(&ctx, Path::new("src/definitions/elements/button.less"))
        .await
        .unwrap();

    assert_eq!(outcome, BuildOutcome::Success);
    assert_eq!(
        fs.contents("docs/build/src/definitions/elements/button.less")
            .as_deref(),
        Some(".button {}")
    );
}

#[tokio::test]
async fn mirror_skips_paths_that_are_not_files() {
    init_tracing();
    let fs = MockFileSystem::new();
    let ctx = context(ConfigFileBuilder::new().build(), fs.clone());

    let outcome = mirror::mirror_file(&ctx, Path::new("src/definitions/elements"))
        .await
        .unwrap();

    assert_eq!(outcome, BuildOutcome::Skipped);
    assert!(fs.paths().is_empty());
}
