//! Managed output directory with timestamped file names.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::GlimpseError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Directory that screenshots and animations are written into.
///
/// The directory is created on first use. File names carry a
/// second-resolution local timestamp; names already handed out by this
/// instance, or already present on disk, get a numeric suffix instead of
/// being overwritten.
#[derive(Debug)]
pub struct OutputDir {
    root: PathBuf,
    reserved: HashSet<PathBuf>,
}

impl OutputDir {
    /// Manage `root` without touching the filesystem yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            reserved: HashSet::new(),
        }
    }

    /// The managed directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (and parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::Io`] if the directory cannot be created.
    pub fn ensure(&self) -> Result<(), GlimpseError> {
        if !self.root.is_dir() {
            std::fs::create_dir_all(&self.root)?;
            log::info!("created output directory {}", self.root.display());
        }
        Ok(())
    }

    /// Reserve a fresh `<prefix>_<timestamp>.<ext>` path, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::Io`] if the directory cannot be created.
    pub fn next_path(
        &mut self,
        prefix: &str,
        ext: &str,
    ) -> Result<PathBuf, GlimpseError> {
        self.ensure()?;
        let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Ok(self.reserve(&format!("{prefix}_{stamp}"), ext))
    }

    fn reserve(&mut self, stem: &str, ext: &str) -> PathBuf {
        let mut candidate = self.root.join(format!("{stem}.{ext}"));
        let mut n = 1u32;
        while self.reserved.contains(&candidate) || candidate.exists() {
            candidate = self.root.join(format!("{stem}_{n}.{ext}"));
            n += 1;
        }
        let _ = self.reserved.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_is_created_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("shots");
        let mut out = OutputDir::new(&root);
        assert!(!root.exists());

        let path = out.next_path("screenshot", "png").unwrap();
        assert!(root.is_dir());
        assert_eq!(path.parent(), Some(root.as_path()));
    }

    #[test]
    fn names_carry_prefix_and_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputDir::new(tmp.path());
        let path = out.next_path("animation", "gif").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("animation_"));
        assert!(name.ends_with(".gif"));
        // animation_YYYY-MM-DD_HH-MM-SS.gif
        assert_eq!(name.len(), "animation_".len() + 19 + ".gif".len());
    }

    #[test]
    fn repeated_stems_get_suffixes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut out = OutputDir::new(tmp.path());
        let a = out.reserve("screenshot_x", "png");
        let b = out.reserve("screenshot_x", "png");
        std::fs::write(tmp.path().join("screenshot_x_2.png"), b"").unwrap();
        let c = out.reserve("screenshot_x", "png");

        assert_eq!(a.file_name().unwrap(), "screenshot_x.png");
        assert_eq!(b.file_name().unwrap(), "screenshot_x_1.png");
        assert_eq!(c.file_name().unwrap(), "screenshot_x_3.png");
    }
}
