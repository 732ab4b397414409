//! Read-only filesystem access used by spec discovery.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use walkdir::WalkDir;

/// Filesystem collaborator for spec discovery.
///
/// Paths passed in are the configured ones (usually relative); paths
/// returned by [`SpecFs::walk`] keep the same shape so served paths can be
/// derived from them.
pub trait SpecFs: Send + Sync {
    /// Read a whole file. A missing file is reported as
    /// [`io::ErrorKind::NotFound`].
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// List all regular files below `dir`, recursively, in lexical order.
    ///
    /// Fails with [`io::ErrorKind::NotFound`] when `dir` does not exist.
    /// Unreadable entries below `dir` are skipped.
    fn walk(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The real filesystem.
#[derive(Debug, Clone, Default)]
pub struct OsFs {
    root: Option<PathBuf>,
}

impl OsFs {
    /// Resolve relative paths against the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SpecFs for OsFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }

    fn walk(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let base = self.resolve(dir);
        std::fs::metadata(&base)?;

        let files = WalkDir::new(&base)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&base).ok()?;
                if relative.as_os_str().is_empty() {
                    // `dir` itself is a file.
                    return Some(dir.to_path_buf());
                }
                Some(dir.join(relative))
            })
            .collect();

        Ok(files)
    }
}

/// In-memory filesystem that counts reads.
///
/// Useful for embedding a spec without touching disk and for asserting how
/// often discovery hits the filesystem.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    denied: RwLock<BTreeSet<PathBuf>>,
    reads: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) -> &Self {
        self.files
            .write()
            .insert(normalize(path.as_ref()), content.into());
        self
    }

    /// Make reads of `path` fail with `PermissionDenied`. The file is still
    /// listed by [`SpecFs::walk`] if it was inserted.
    pub fn deny(&self, path: impl AsRef<Path>) -> &Self {
        self.denied.write().insert(normalize(path.as_ref()));
        self
    }

    /// Number of [`SpecFs::read`] calls so far, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SpecFs for MemoryFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let key = normalize(path);

        if self.denied.read().contains(&key) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }

        self.files
            .read()
            .get(&key)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "file not found"))
    }

    fn walk(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let base = normalize(dir);
        let files: Vec<PathBuf> = self
            .files
            .read()
            .keys()
            .filter_map(|key| key.strip_prefix(&base).ok())
            .filter(|relative| !relative.as_os_str().is_empty())
            .map(|relative| dir.join(relative))
            .collect();

        if files.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "directory not found",
            ));
        }
        Ok(files)
    }
}

/// Drop `.` components so `./api/x.json` and `api/x.json` are the same key.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
