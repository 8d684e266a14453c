// src/tools/command.rs

use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::config::ToolsSection;
use crate::errors::{DocwatchError, Result};

use super::{ToolFuture, Toolchain};

/// Toolchain that shells out to the commands configured in `[tools]`.
///
/// Commands run through the platform shell so users can configure full
/// command lines (`postcss --use autoprefixer`) rather than bare binaries.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    tools: ToolsSection,
}

impl CommandToolchain {
    pub fn new(tools: ToolsSection) -> Self {
        Self { tools }
    }

    #[cfg(not(windows))]
    fn shell(command_line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }

    #[cfg(windows)]
    fn shell(command_line: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }

    fn tool_error(tool: &str, message: impl Into<String>) -> DocwatchError {
        DocwatchError::ToolError {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// Run a command line, capture stdout, fail on nonzero exit.
    async fn run(tool: &str, command_line: &str, stdin_text: Option<&str>) -> Result<String> {
        debug!(tool, command = command_line, "invoking external tool");

        let mut cmd = Self::shell(command_line);
        cmd.stdin(if stdin_text.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| Self::tool_error(tool, format!("failed to spawn: {e}")))?;

        if let Some(text) = stdin_text {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| Self::tool_error(tool, "stdin handle missing"))?;
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| Self::tool_error(tool, format!("failed writing stdin: {e}")))?;
            // Closing stdin lets the filter see EOF and finish.
            drop(stdin);
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Self::tool_error(tool, format!("failed waiting: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::tool_error(
                tool,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Toolchain for CommandToolchain {
    fn compile<'a>(&'a self, source: &'a Path) -> ToolFuture<'a, String> {
        Box::pin(async move {
            let command_line = format!(
                "{} \"{}\"",
                self.tools.compiler,
                source.to_string_lossy().replace('\\', "/")
            );
            Self::run("compiler", &command_line, None).await
        })
    }

    fn prefix<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move { Self::run("prefixer", &self.tools.prefixer, Some(css)).await })
    }

    fn minify_css<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move { Self::run("css-minifier", &self.tools.css_minifier, Some(css)).await })
    }

    fn minify_js<'a>(&'a self, js: &'a str) -> ToolFuture<'a, String> {
        Box::pin(async move { Self::run("js-minifier", &self.tools.js_minifier, Some(js)).await })
    }
}
