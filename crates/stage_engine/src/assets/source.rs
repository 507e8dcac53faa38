//! Byte sources the loader reads from

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;

use super::AssetError;

/// Provides raw asset bytes for a resolved path
pub trait AssetSource {
    /// Read the full contents at `path`
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError>;
}

/// Reads from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl AssetSource for FileSource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => AssetError::NotFound(path.to_string()),
            _ => AssetError::Io {
                path: path.to_string(),
                source,
            },
        })
    }
}

/// In-memory file table, for embedded assets and tests
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `path`, builder style
    pub fn with_file(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Store `bytes` under `path`, replacing any previous entry
    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySource::new().with_file("a.bin", vec![1, 2, 3]);

        assert_eq!(source.read("a.bin").unwrap(), vec![1, 2, 3]);
        assert!(matches!(source.read("b.bin"), Err(AssetError::NotFound(path)) if path == "b.bin"));
    }

    #[test]
    fn test_file_source_missing_file_is_not_found() {
        let result = FileSource.read("definitely/not/here.png");
        assert!(matches!(result, Err(AssetError::NotFound(_))));
    }
}
