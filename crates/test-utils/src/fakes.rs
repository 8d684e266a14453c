#![allow(dead_code)]

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use docwatch::engine::{BuildJob, BuildOutcome, PackageAction, RuntimeEvent};
use docwatch::errors::DocwatchError;
use docwatch::package::{PackageFuture, Packager};
use docwatch::pipeline::backend::BackendFuture;
use docwatch::pipeline::BuildBackend;
use docwatch::tools::{ToolFuture, Toolchain};

/// A fake toolchain with deterministic text transforms:
/// - `compile` emits `/*compiled <path>*/` plus the configured body
/// - `prefix` passes text through
/// - minifiers prepend a `/*min*/` marker
///
/// Every call is counted, minifiers can be switched to fail, and `compile`
/// can be slowed down so cancellation has something to race against.
#[derive(Default)]
pub struct FakeToolchain {
    pub compile_calls: AtomicUsize,
    pub prefix_calls: AtomicUsize,
    pub minify_css_calls: AtomicUsize,
    pub minify_js_calls: AtomicUsize,
    pub fail_minify_css: AtomicBool,
    pub fail_minify_js: AtomicBool,
    compile_body: Mutex<String>,
    compile_delay: Mutex<Option<Duration>>,
}

impl fmt::Debug for FakeToolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeToolchain").finish_non_exhaustive()
    }
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// CSS body appended to every compile result.
    pub fn set_compile_body(&self, body: &str) {
        *self.compile_body.lock().unwrap() = body.to_string();
    }

    /// Make `compile` sleep before returning.
    pub fn set_compile_delay(&self, delay: Duration) {
        *self.compile_delay.lock().unwrap() = Some(delay);
    }

    fn tool_error(tool: &str) -> DocwatchError {
        DocwatchError::ToolError {
            tool: tool.to_string(),
            message: "forced failure".to_string(),
        }
    }
}

impl Toolchain for FakeToolchain {
    fn compile<'a>(&'a self, source: &'a Path) -> ToolFuture<'a, String> {
        Box::pin(async move {
            self.compile_calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.compile_delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let body = self.compile_body.lock().unwrap().clone();
            // The marker deliberately avoids the `/* ... */` shape that
            // comment normalization rewrites.
            Ok(format!(
                "/*compiled {}*/\n{body}",
                source.to_string_lossy().replace('\\', "/")
            ))
        })
    }

    fn prefix<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move {
            self.prefix_calls.fetch_add(1, Ordering::SeqCst);
            Ok(css.to_string())
        })
    }

    fn minify_css<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move {
            self.minify_css_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_minify_css.load(Ordering::SeqCst) {
                return Err(Self::tool_error("css-minifier"));
            }
            Ok(format!("/*min*/{css}"))
        })
    }

    fn minify_js<'a>(&'a self, js: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move {
            self.minify_js_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_minify_js.load(Ordering::SeqCst) {
                return Err(Self::tool_error("js-minifier"));
            }
            Ok(format!("/*min*/{js}"))
        })
    }
}

/// A fake build backend that:
/// - records which jobs were "started"
/// - immediately reports `BuildFinished(Success)` for each one.
pub struct FakeBuildBackend {
    event_tx: mpsc::Sender<RuntimeEvent>,
    started: Arc<Mutex<Vec<BuildJob>>>,
}

impl fmt::Debug for FakeBuildBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeBuildBackend").finish_non_exhaustive()
    }
}

impl FakeBuildBackend {
    pub fn new(event_tx: mpsc::Sender<RuntimeEvent>, started: Arc<Mutex<Vec<BuildJob>>>) -> Self {
        Self { event_tx, started }
    }
}

impl BuildBackend for FakeBuildBackend {
    fn start_build(
        &mut self,
        job: BuildJob,
        generation: u64,
        _cancel_rx: oneshot::Receiver<()>,
    ) -> BackendFuture<'_> {
        let tx = self.event_tx.clone();
        let started = Arc::clone(&self.started);

        Box::pin(async move {
            let key = job.key();
            {
                let mut guard = started.lock().unwrap();
                guard.push(job);
            }

            tx.send(RuntimeEvent::BuildFinished {
                key,
                generation,
                outcome: BuildOutcome::Success,
            })
            .await
            .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }
}

/// A packager that records every requested action instead of spawning
/// commands.
#[derive(Debug, Default, Clone)]
pub struct RecordingPackager {
    actions: Arc<Mutex<Vec<PackageAction>>>,
}

impl RecordingPackager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> Vec<PackageAction> {
        self.actions.lock().unwrap().clone()
    }
}

impl Packager for RecordingPackager {
    fn package(&mut self, action: PackageAction) -> PackageFuture<'_> {
        Box::pin(async move {
            self.actions.lock().unwrap().push(action);
            Ok(())
        })
    }
}

/// Drain every `PackageRequested` action out of an event receiver without
/// blocking; other events are dropped.
pub fn drain_package_requests(rx: &mut mpsc::Receiver<RuntimeEvent>) -> Vec<PackageAction> {
    let mut actions = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let RuntimeEvent::PackageRequested { action } = event {
            actions.push(action);
        }
    }
    actions
}
