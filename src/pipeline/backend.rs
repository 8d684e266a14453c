// src/pipeline/backend.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::engine::{BuildJob, BuildOutcome, RuntimeEvent};
use crate::errors::Result;

use super::{assets, mirror, script, style, BuildContext};

pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Seam between the runtime and the build pipelines.
///
/// `start_build` must return quickly; the work itself runs in the
/// background and reports back with a `BuildFinished` event echoing the
/// instance's generation. A build that observes its cancellation signal
/// stops silently, without a completion event, so the superseding run
/// inherits its table slot.
pub trait BuildBackend: Send + fmt::Debug {
    fn start_build(
        &mut self,
        job: BuildJob,
        generation: u64,
        cancel_rx: oneshot::Receiver<()>,
    ) -> BackendFuture<'_>;
}

/// Backend that runs each job as a spawned Tokio task.
#[derive(Clone)]
pub struct RealBuildBackend {
    ctx: BuildContext,
}

impl fmt::Debug for RealBuildBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealBuildBackend").finish_non_exhaustive()
    }
}

impl RealBuildBackend {
    pub fn new(ctx: BuildContext) -> Self {
        Self { ctx }
    }
}

async fn run_job(ctx: &BuildContext, job: &BuildJob) -> Result<BuildOutcome> {
    match job {
        BuildJob::Style { source } => style::build_style(ctx, source).await,
        BuildJob::Script { path } => script::build_script(ctx, path).await,
        BuildJob::Asset { path } => assets::copy_asset(ctx, path).await,
        BuildJob::Mirror { path } => mirror::mirror_file(ctx, path).await,
    }
}

impl BuildBackend for RealBuildBackend {
    fn start_build(
        &mut self,
        job: BuildJob,
        generation: u64,
        mut cancel_rx: oneshot::Receiver<()>,
    ) -> BackendFuture<'_> {
        Box::pin(async move {
            let ctx = self.ctx.clone();
            tokio::spawn(async move {
                let key = job.key();
                tokio::select! {
                    _ = &mut cancel_rx => {
                        debug!(key = %key, "build superseded; dropping without completion");
                    }
                    result = run_job(&ctx, &job) => {
                        let outcome = match result {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                error!(key = %key, error = %e, "build failed");
                                BuildOutcome::Failed
                            }
                        };
                        let _ = ctx
                            .event_tx
                            .send(RuntimeEvent::BuildFinished {
                                key,
                                generation,
                                outcome,
                            })
                            .await;
                    }
                }
            });
            Ok(())
        })
    }
}
