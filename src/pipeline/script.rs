// src/pipeline/script.rs

//! The script build: verbatim copy plus minified variant.
//!
//! The uncompressed copy is written before minification runs, so a broken
//! minifier still leaves a current uncompressed script behind. Package
//! actions fire only once the whole chain has completed; an aborted chain
//! requests nothing.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::engine::{BuildOutcome, PackageAction};
use crate::errors::Result;
use crate::route::{rel_str, strip_root};

use super::{min_name, BuildContext};

pub async fn build_script(ctx: &BuildContext, path: &Path) -> Result<BuildOutcome> {
    let rel = rel_str(path);

    if !ctx.fs.is_file(path) {
        warn!(source = %rel, "script source missing; skipping build");
        return Ok(BuildOutcome::Skipped);
    }

    let Some(below) = strip_root(&rel, &ctx.config.source.definitions) else {
        warn!(source = %rel, "script outside the definitions root; skipping");
        return Ok(BuildOutcome::Skipped);
    };

    info!(source = %rel, "building script");
    let source_text = ctx.fs.read_to_string(path)?;

    let target = PathBuf::from(format!("{}{}", ctx.config.output.uncompressed, below));
    ctx.write_output(&target, source_text.as_bytes())?;

    match ctx.tools.minify_js(&source_text).await {
        Ok(minified) => {
            let target = PathBuf::from(format!(
                "{}{}",
                ctx.config.output.compressed,
                min_name(below)
            ));
            ctx.write_output(&target, minified.as_bytes())?;
            ctx.request_package(PackageAction::CompressedJs).await;
            ctx.request_package(PackageAction::UncompressedJs).await;
            Ok(BuildOutcome::Success)
        }
        Err(e) => {
            error!(source = %rel, error = %e, "js minification failed");
            Ok(BuildOutcome::Failed)
        }
    }
}
