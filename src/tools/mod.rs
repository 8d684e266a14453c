// src/tools/mod.rs

//! External tool seams for the style and script pipelines.
//!
//! The pipelines never link compilers or minifiers; they call through the
//! [`Toolchain`] trait. Production uses [`CommandToolchain`], which shells
//! out to the commands configured in `[tools]`; tests use counting fakes.

use std::fmt::Debug;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;

pub mod command;

pub type ToolFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// The four tool invocations the pipelines need.
///
/// `compile` receives a source file path; the other three are text filters
/// fed on stdin and read from stdout.
pub trait Toolchain: Send + Sync + Debug {
    /// Compile a style source file into CSS text.
    fn compile<'a>(&'a self, source: &'a Path) -> ToolFuture<'a, String>;

    /// Add vendor prefixes to compiled CSS.
    fn prefix<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String>;

    /// Minify CSS text.
    fn minify_css<'a>(&'a self, css: &'a str) -> ToolFuture<'a, String>;

    /// Minify JS text.
    fn minify_js<'a>(&'a self, js: &'a str) -> ToolFuture<'a, String>;
}

pub use command::CommandToolchain;
