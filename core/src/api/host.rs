//! Host capabilities: where included documents come from and how their
//! content is named.

use std::path::{Component, Path, PathBuf};

use hashbrown::HashMap;
use sha2::{Digest as _, Sha256};
use thiserror::Error;

use crate::js64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("'{path}' not found")]
    NotFound { path: String },

    #[error("'{path}' is not a valid document path")]
    InvalidPath { path: String },

    #[error("failed to read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("'{path}' is not valid UTF-8 (at byte {offset})")]
    InvalidUtf8 { path: String, offset: usize },
}

/// Read access to documents by path.
pub trait Storage {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    fn read_text(&self, path: &str) -> Result<String, StorageError> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| StorageError::InvalidUtf8 {
            path: path.to_string(),
            offset: e.utf8_error().valid_up_to(),
        })
    }
}

/// In-memory documents, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl Storage for MemoryStorage {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Documents under a directory. Paths are relative to `root` and may not
/// leave it.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let inside = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || !inside {
            return Err(StorageError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for FileStorage {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        tracing::debug!(path = %full.display(), "reading document");
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound {
                path: path.to_string(),
            },
            _ => StorageError::Io {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
    }
}

/// A 256-bit content digest.
pub trait Digest256 {
    fn digest(&self, bytes: &[u8]) -> [u8; 32];
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl Digest256 for Sha256Digest {
    fn digest(&self, bytes: &[u8]) -> [u8; 32] {
        Sha256::digest(bytes).into()
    }
}

/// Binding name for a document with the given contents:
/// `js64(digest(bytes))`. Identical contents always get the same name.
pub fn content_name(digest: &dyn Digest256, bytes: &[u8]) -> String {
    js64::encode(&digest.digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new()
            .with_file("a.jx", "{ a: 1 }")
            .with_file("bad.txt", vec![0xFF, 0xFE]);

        assert_eq!(storage.read_text("a.jx").unwrap(), "{ a: 1 }");
        assert_eq!(
            storage.read_bytes("missing.jx"),
            Err(StorageError::NotFound {
                path: "missing.jx".to_string()
            })
        );
        assert_eq!(
            storage.read_text("bad.txt"),
            Err(StorageError::InvalidUtf8 {
                path: "bad.txt".to_string(),
                offset: 0
            })
        );
        assert_eq!(storage.read_bytes("bad.txt").unwrap(), vec![0xFF, 0xFE]);
    }

    #[test]
    fn test_file_storage_rejects_escaping_paths() {
        let storage = FileStorage::new("/nonexistent-root");
        for path in ["", "../etc/passwd", "/etc/passwd", "a/../../b"] {
            assert_eq!(
                storage.read_bytes(path),
                Err(StorageError::InvalidPath {
                    path: path.to_string()
                }),
                "{}",
                path
            );
        }
        assert!(matches!(
            storage.read_bytes("sub/missing.jx"),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn test_file_storage_reads_files() {
        let dir = std::env::temp_dir().join(format!("jsonx-storage-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        std::fs::write(dir.join("sub/doc.jx"), "[1, 2]").unwrap();

        let storage = FileStorage::new(&dir);
        assert_eq!(storage.read_text("sub/doc.jx").unwrap(), "[1, 2]");
        assert_eq!(storage.read_text("./sub/doc.jx").unwrap(), "[1, 2]");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_content_name() {
        let name = content_name(&Sha256Digest, b"hello");
        // 32 digest bytes encode to ceil(32 * 4 / 3) + 1 symbols.
        assert_eq!(name.len(), 44);
        assert!(js64::is_js64(&name));
        assert_eq!(
            js64::decode(&name).unwrap(),
            Sha256Digest.digest(b"hello").to_vec()
        );
        assert_eq!(name, content_name(&Sha256Digest, b"hello"));
        assert_ne!(name, content_name(&Sha256Digest, b"hello "));
    }
}
