use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;

use docwatch::config::ConfigFile;
use docwatch::engine::{BuildOutcome, PackageAction, RuntimeEvent};
use docwatch::fs::mock::MockFileSystem;
use docwatch::pipeline::{script, BuildContext};
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::fakes::{drain_package_requests, FakeToolchain};
use docwatch_test_utils::init_tracing;

const SOURCE: &str = "src/definitions/modules/dropdown.js";
const OUT_PLAIN: &str = "docs/build/uncompressed/modules/dropdown.js";
const OUT_MIN: &str = "docs/build/compressed/modules/dropdown.min.js";

fn context(
    cfg: ConfigFile,
    fs: MockFileSystem,
    tools: Arc<FakeToolchain>,
) -> (BuildContext, mpsc::Receiver<RuntimeEvent>) {
    let (event_tx, event_rx) = mpsc::channel(64);
    (
        BuildContext {
            config: Arc::new(cfg),
            fs: Arc::new(fs),
            tools,
            event_tx,
        },
        event_rx,
    )
}

#[tokio::test]
async fn script_build_writes_copy_and_min_variant() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, "function dropdown() {}\n");
    let tools = Arc::new(FakeToolchain::new());
    let (ctx, mut rx) = context(ConfigFileBuilder::new().build(), fs.clone(), tools.clone());

    let outcome = script::build_script(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(outcome, BuildOutcome::Success);
    assert_eq!(fs.contents(OUT_PLAIN).as_deref(), Some("function dropdown() {}\n"));
    assert_eq!(
        fs.contents(OUT_MIN).as_deref(),
        Some("/*min*/function dropdown() {}\n")
    );
    assert_eq!(tools.minify_js_calls.load(Ordering::SeqCst), 1);
    // Both actions fire only once the whole chain has completed.
    assert_eq!(
        drain_package_requests(&mut rx),
        vec![PackageAction::CompressedJs, PackageAction::UncompressedJs]
    );
}

#[tokio::test]
async fn minifier_failure_keeps_the_uncompressed_copy() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, "function dropdown() {}\n");
    let tools = Arc::new(FakeToolchain::new());
    tools.fail_minify_js.store(true, Ordering::SeqCst);
    let (ctx, mut rx) = context(ConfigFileBuilder::new().build(), fs.clone(), tools);

    let outcome = script::build_script(&ctx, Path::new(SOURCE)).await.unwrap();

    // The copy was written before minification ran, and it stays; but the
    // chain never completed, so no package action fires.
    assert_eq!(outcome, BuildOutcome::Failed);
    assert!(fs.contents(OUT_PLAIN).is_some());
    assert!(fs.contents(OUT_MIN).is_none());
    assert!(drain_package_requests(&mut rx).is_empty());
}

#[tokio::test]
async fn missing_script_is_skipped() {
    init_tracing();
    let fs = MockFileSystem::new();
    let (ctx, mut rx) = context(
        ConfigFileBuilder::new().build(),
        fs.clone(),
        Arc::new(FakeToolchain::new()),
    );

    let outcome = script::build_script(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(outcome, BuildOutcome::Skipped);
    assert!(fs.paths().is_empty());
    assert!(drain_package_requests(&mut rx).is_empty());
}
