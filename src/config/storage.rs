//! Byte-oriented file stores used for persistence

use anyhow::{bail, Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Minimal file access needed to persist settings
pub trait FileStore {
    fn exists(&self, path: &Path) -> bool;

    fn read_all(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write the whole file (not atomic)
    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;

    /// Create `path` and any missing parents
    fn ensure_directory(&mut self, path: &Path) -> Result<()>;
}

/// Real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn ensure_directory(&mut self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory {}", path.display()))
    }
}

/// In-memory files, for dry runs and tests.
/// A read-only store rejects every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: HashMap<PathBuf, Vec<u8>>,
    directories: HashSet<PathBuf>,
    read_only: bool,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a file without going through `write_all`
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), bytes.into());
        self
    }

    pub fn contents(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn has_directory(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .with_context(|| format!("No such file {}", path.display()))
    }

    fn write_all(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        if self.read_only {
            bail!("Refusing to write {}: store is read-only", path.display());
        }
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn ensure_directory(&mut self, path: &Path) -> Result<()> {
        if self.read_only {
            bail!("Refusing to create directory {}: store is read-only", path.display());
        }
        for ancestor in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            self.directories.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_write_then_read() {
        let mut store = MemoryFileStore::new();
        let path = Path::new("/cfg/app/settings.json");
        assert!(!store.exists(path));
        assert!(store.read_all(path).is_err());

        store.ensure_directory(Path::new("/cfg/app")).unwrap();
        assert!(store.has_directory(Path::new("/cfg")));
        assert!(store.has_directory(Path::new("/cfg/app")));

        store.write_all(path, b"{}").unwrap();
        assert!(store.exists(path));
        assert_eq!(store.read_all(path).unwrap(), b"{}");
    }

    #[test]
    fn test_memory_store_read_only() {
        let path = Path::new("settings.json");
        let mut store = MemoryFileStore::read_only().with_file(path, "seed");

        assert_eq!(store.contents(path), Some(&b"seed"[..]));
        assert!(store.write_all(path, b"new").is_err());
        assert!(store.ensure_directory(Path::new("dir")).is_err());
        assert_eq!(store.contents(path), Some(&b"seed"[..]));
    }

    #[test]
    fn test_fs_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("presentation-settings-storage-{}", std::process::id()));
        let nested = dir.join("a/b");
        let path = nested.join("file.json");
        let mut store = FsFileStore;

        store.ensure_directory(&nested).unwrap();
        store.write_all(&path, b"[1,2,3]").unwrap();
        assert!(store.exists(&path));
        assert_eq!(store.read_all(&path).unwrap(), b"[1,2,3]");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fs_store_read_missing_has_context() {
        let store = FsFileStore;
        let err = store.read_all(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
