use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;

use docwatch::config::ConfigFile;
use docwatch::engine::{BuildOutcome, PackageAction, RuntimeEvent};
use docwatch::fs::mock::MockFileSystem;
use docwatch::pipeline::{style, BuildContext};
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::fakes::{drain_package_requests, FakeToolchain};
use docwatch_test_utils::init_tracing;

const SOURCE: &str = "src/definitions/elements/button.less";
const OUT_PLAIN: &str = "docs/build/uncompressed/elements/button.css";
const OUT_MIN: &str = "docs/build/compressed/elements/button.min.css";

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
async fn one_compile_produces_both_branches() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, ".button {}");
    let tools = Arc::new(FakeToolchain::new());
    tools.set_compile_body(".button { background: url(themes/default/assets/img/bg.png); }\n");
    let (ctx, mut rx) = context(ConfigFileBuilder::new().build(), fs.clone(), tools.clone());

    let outcome = style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(outcome, BuildOutcome::Success);
    assert_eq!(tools.compile_calls.load(Ordering::SeqCst), 1);

    let plain = fs.contents(OUT_PLAIN).expect("uncompressed output written");
    let min = fs.contents(OUT_MIN).expect("compressed output written");

    // Both branches rewrote the asset reference to their configured form.
    assert!(plain.contains("url(../assets/img/bg.png)"));
    assert!(min.contains("url(../assets/img/bg.png)"));

    // Banner leads both files; minification markers only the compressed one.
    assert!(plain.starts_with("/*!\n * docs 0.0.0\n */\n"));
    assert!(min.starts_with("/*!\n * docs 0.0.0\n */\n/*min*/"));

    assert_eq!(
        drain_package_requests(&mut rx),
        vec![PackageAction::UncompressedCss, PackageAction::CompressedCss]
    );
}

#[tokio::test]
async fn branches_rewrite_assets_independently() {
    init_tracing();
    let cfg = ConfigFileBuilder::new()
        .with_asset_rewrites("themes/default/assets/", "plain/assets/", "mini/assets/")
        .build();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, ".button {}");
    let tools = Arc::new(FakeToolchain::new());
    tools.set_compile_body("url(themes/default/assets/a.png)\n");
    let (ctx, _rx) = context(cfg, fs.clone(), tools);

    style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert!(fs.contents(OUT_PLAIN).unwrap().contains("url(plain/assets/a.png)"));
    assert!(fs.contents(OUT_MIN).unwrap().contains("url(mini/assets/a.png)"));
}

#[tokio::test]
async fn missing_source_skips_without_output() {
    init_tracing();
    let fs = MockFileSystem::new();
    let tools = Arc::new(FakeToolchain::new());
    let (ctx, mut rx) = context(ConfigFileBuilder::new().build(), fs.clone(), tools.clone());

    let outcome = style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(outcome, BuildOutcome::Skipped);
    assert_eq!(tools.compile_calls.load(Ordering::SeqCst), 0);
    assert!(fs.paths().is_empty());
    assert!(drain_package_requests(&mut rx).is_empty());
}

#[tokio::test]
async fn minifier_failure_keeps_the_uncompressed_branch() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, ".button {}");
    let tools = Arc::new(FakeToolchain::new());
    tools.fail_minify_css.store(true, Ordering::SeqCst);
    let (ctx, mut rx) = context(ConfigFileBuilder::new().build(), fs.clone(), tools);

    let outcome = style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(outcome, BuildOutcome::Failed);
    assert!(fs.contents(OUT_PLAIN).is_some());
    assert!(fs.contents(OUT_MIN).is_none());
    // Only the branch that succeeded asked for packaging.
    assert_eq!(
        drain_package_requests(&mut rx),
        vec![PackageAction::UncompressedCss]
    );
}

#[tokio::test]
async fn outputs_carry_the_configured_permission() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().with_permission("644").build();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, ".button {}");
    let (ctx, _rx) = context(cfg, fs.clone(), Arc::new(FakeToolchain::new()));

    style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert_eq!(fs.mode_of(OUT_PLAIN), Some(0o644));
    assert_eq!(fs.mode_of(OUT_MIN), Some(0o644));
}

#[tokio::test]
async fn empty_banner_template_writes_bare_css() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().with_banner("").build();
    let fs = MockFileSystem::new();
    fs.add_file(SOURCE, ".button {}");
    let (ctx, _rx) = context(cfg, fs.clone(), Arc::new(FakeToolchain::new()));

    style::build_style(&ctx, Path::new(SOURCE)).await.unwrap();

    assert!(fs.contents(OUT_PLAIN).unwrap().starts_with("/*compiled "));
}
