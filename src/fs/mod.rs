// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface used by the build pipelines.
///
/// Production code uses [`RealFileSystem`]; tests use the in-memory
/// [`mock::MockFileSystem`] so pipelines can run without touching disk.
pub trait FileSystem: Send + Sync + Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Write, creating parent directories as needed.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    /// Byte-for-byte copy, creating parent directories as needed.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    /// Stamp a unix permission mode onto a file. No-op on platforms
    /// without unix modes.
    fn set_mode(&self, path: &Path, mode: u32) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {parent:?}"))?;
        }
        Ok(())
    }
}

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading file {path:?}"))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {path:?}"))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        fs::write(path, contents).with_context(|| format!("writing file {path:?}"))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        Self::ensure_parent(to)?;
        fs::copy(from, to).with_context(|| format!("copying {from:?} to {to:?}"))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("setting mode {mode:o} on {path:?}"))
    }

    #[cfg(not(unix))]
    fn set_mode(&self, _path: &Path, _mode: u32) -> Result<()> {
        Ok(())
    }
}
