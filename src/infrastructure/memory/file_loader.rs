//! In-Memory File Loader Implementation

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{FileContent, FileKind, FileLoaderError, FileLoaderPort};

/// 内存文件加载器
///
/// 相对路径 → 文件内容，供测试和预取场景使用
pub struct InMemoryFileLoader {
    files: DashMap<PathBuf, String>,
}

impl InMemoryFileLoader {
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    pub fn insert(&self, relative_path: impl AsRef<Path>, content: impl Into<String>) {
        let path = relative_path.as_ref().to_path_buf();
        tracing::debug!(path = %path.display(), "In-memory file added");
        self.files.insert(path, content.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn arc(self) -> Arc<dyn FileLoaderPort> {
        Arc::new(self)
    }
}

impl Default for InMemoryFileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLoaderPort for InMemoryFileLoader {
    fn load_file(&self, relative_path: &Path) -> Result<FileContent, FileLoaderError> {
        let kind = FileKind::from_path(relative_path)?;
        self.files
            .get(relative_path)
            .map(|raw| FileContent::from_raw(kind, raw.clone()))
            .ok_or_else(|| FileLoaderError::NotFound(relative_path.to_path_buf()))
    }

    fn describe(&self) -> String {
        format!("memory:{} files", self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_load() {
        let loader = InMemoryFileLoader::new();
        loader.insert("corpora/a/texts/x.txt", "Some text");
        assert_eq!(loader.len(), 1);
        assert_eq!(
            loader.load_text(Path::new("corpora/a/texts/x.txt")).unwrap(),
            "Some text"
        );
        assert!(matches!(
            loader.load_file(Path::new("corpora/a/texts/y.txt")),
            Err(FileLoaderError::NotFound(_))
        ));
    }
}
