// src/lib.rs

//! docwatch: watch a UI source tree and incrementally rebuild the
//! documentation site's assets.
//!
//! The crate splits into:
//! - [`config`]: `Docwatch.toml` loading and validation
//! - [`route`]: change classification and style-source resolution
//! - [`pipeline`]: the per-file build pipelines and their backend
//! - [`engine`]: the pure core runtime plus its async shell
//! - [`watch`]: the `notify` watcher and glob profiles
//! - [`tools`] / [`package`]: seams to external commands

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod package;
pub mod pipeline;
pub mod route;
pub mod tools;
pub mod types;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use cli::CliArgs;
use config::ConfigFile;
use engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use errors::Result;
use package::CommandPackager;
use pipeline::{BuildContext, RealBuildBackend};
use route::Router;
use tools::CommandToolchain;

/// Capacity of the runtime event channel. The watcher and finished builds
/// both feed it; backpressure only delays change pickup.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Load config, start the watcher and run the runtime until shutdown.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = Path::new(&args.config);
    let config = config::load_and_validate(config_path)?;

    // The directory holding the config file is the project root all
    // configured paths resolve against.
    if let Some(root) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::env::set_current_dir(root)?;
        info!(root = %root.display(), "project root");
    }

    if args.dry_run {
        print_layout(&config);
        return Ok(());
    }

    let config = Arc::new(config);
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    let ctx = BuildContext {
        config: Arc::clone(&config),
        fs: Arc::new(fs::RealFileSystem),
        tools: Arc::new(CommandToolchain::new(config.tools.clone())),
        event_tx: event_tx.clone(),
    };
    let backend = RealBuildBackend::new(ctx);
    let packager = CommandPackager::new(config.package.clone());

    let profiles = watch::WatchProfiles::from_config(&config)?;
    let _watcher = watch::spawn(std::env::current_dir()?, profiles, event_tx.clone())?;

    let shutdown_tx = event_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; shutting down");
            let _ = shutdown_tx.send(RuntimeEvent::ShutdownRequested).await;
        }
    });

    let core = CoreRuntime::new(
        Router::from_config(&config),
        config.build.overlap,
        RuntimeOptions {
            exit_when_idle: false,
        },
    );
    Runtime::new(core, event_rx, backend, packager).run().await
}

/// Print the effective layout for `--dry-run`.
fn print_layout(config: &ConfigFile) {
    println!("source root:        {}", config.source.root);
    println!("theme config:       {}", config.source.config);
    println!("definitions:        {}", config.source.definitions);
    println!("site overrides:     {}", config.source.site);
    println!("packaged themes:    {}", config.source.themes);
    println!("output uncompressed: {}", config.output.uncompressed);
    println!("output compressed:   {}", config.output.compressed);
    println!("output themes:       {}", config.output.themes);
    println!("output mirror:       {}", config.output.mirror);
    println!("overlap policy:      {:?}", config.build.overlap);
    println!("components:          {}", config.assets.components.join(", "));
}
