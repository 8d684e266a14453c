// src/pipeline/style.rs

//! The style build: one compile, two compression branches.
//!
//! The resolved definition is compiled once; the intermediate CSS is then
//! forked into the uncompressed and compressed branches, which differ only
//! in asset-reference rewriting, minification and the `.min` file name.
//! Branch failures are independent: one branch failing still leaves the
//! other branch's output on disk.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::engine::{BuildOutcome, PackageAction};
use crate::errors::Result;
use crate::route::resolve::replace_extension;
use crate::route::{rel_str, strip_root};

use super::{banner, comments, min_name, BuildContext};

pub async fn build_style(ctx: &BuildContext, source: &Path) -> Result<BuildOutcome> {
    let rel = rel_str(source);

    if !ctx.fs.is_file(source) {
        // Overrides can exist for definitions that were never written;
        // nothing to compile in that case.
        warn!(source = %rel, "resolved style source missing; skipping build");
        return Ok(BuildOutcome::Skipped);
    }

    let Some(below) = strip_root(&rel, &ctx.config.source.definitions) else {
        warn!(source = %rel, "style source outside the definitions root; skipping");
        return Ok(BuildOutcome::Skipped);
    };
    let css_rel = replace_extension(below, "css");

    info!(source = %rel, "compiling style source");
    let css = ctx.tools.compile(source).await?;
    let css = comments::normalize(&css);
    let css = ctx.tools.prefix(&css).await?;

    let assets = &ctx.config.assets;
    let build = &ctx.config.build;
    let mut failed = false;

    // Uncompressed branch.
    let text = css.replace(&assets.source, &assets.uncompressed);
    let text = banner::prepend(build, &text);
    let target = PathBuf::from(format!("{}{}", ctx.config.output.uncompressed, css_rel));
    match ctx.write_output(&target, text.as_bytes()) {
        Ok(()) => ctx.request_package(PackageAction::UncompressedCss).await,
        Err(e) => {
            error!(target = %target.display(), error = %e, "uncompressed branch failed");
            failed = true;
        }
    }

    // Compressed branch.
    let text = css.replace(&assets.source, &assets.compressed);
    match ctx.tools.minify_css(&text).await {
        Ok(minified) => {
            let text = banner::prepend(build, &minified);
            let target = PathBuf::from(format!(
                "{}{}",
                ctx.config.output.compressed,
                min_name(&css_rel)
            ));
            match ctx.write_output(&target, text.as_bytes()) {
                Ok(()) => ctx.request_package(PackageAction::CompressedCss).await,
                Err(e) => {
                    error!(target = %target.display(), error = %e, "compressed branch failed");
                    failed = true;
                }
            }
        }
        Err(e) => {
            error!(source = %rel, error = %e, "css minification failed");
            failed = true;
        }
    }

    Ok(if failed {
        BuildOutcome::Failed
    } else {
        BuildOutcome::Success
    })
}
