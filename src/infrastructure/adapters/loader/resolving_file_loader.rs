//! Resolving File Loader - 本地优先、远程回退
//!
//! 构造时确定一次策略，之后所有读取都走同一来源

use std::path::Path;

use super::{LocalFileLoader, RemoteFileLoader, RemoteFileLoaderConfig};
use crate::application::ports::{CorpusSource, FileContent, FileLoaderError, FileLoaderPort};

enum Strategy {
    Local(LocalFileLoader),
    Remote(RemoteFileLoader),
}

/// 按策略分派的文件加载器
pub struct ResolvingFileLoader {
    strategy: Strategy,
}

impl ResolvingFileLoader {
    pub fn new(
        source: CorpusSource,
        root_dir: impl AsRef<Path>,
        remote: RemoteFileLoaderConfig,
    ) -> Result<Self, FileLoaderError> {
        let root_dir = root_dir.as_ref();
        let use_local = match source {
            CorpusSource::Local => true,
            CorpusSource::Remote => false,
            CorpusSource::Auto => {
                let found = LocalFileLoader::has_corpora_dir(root_dir);
                if !found {
                    tracing::warn!(
                        root_dir = %root_dir.display(),
                        base_url = %remote.base_url,
                        "No local corpora directory, falling back to remote files"
                    );
                }
                found
            }
        };

        let strategy = if use_local {
            Strategy::Local(LocalFileLoader::new(root_dir))
        } else {
            Strategy::Remote(RemoteFileLoader::new(remote)?)
        };

        let loader = Self { strategy };
        tracing::info!(
            source = source.as_str(),
            resolved = %loader.describe(),
            "File loader resolved"
        );
        Ok(loader)
    }

    pub fn is_local(&self) -> bool {
        matches!(self.strategy, Strategy::Local(_))
    }
}

impl FileLoaderPort for ResolvingFileLoader {
    fn load_file(&self, relative_path: &Path) -> Result<FileContent, FileLoaderError> {
        match &self.strategy {
            Strategy::Local(loader) => loader.load_file(relative_path),
            Strategy::Remote(loader) => loader.load_file(relative_path),
        }
    }

    fn describe(&self) -> String {
        match &self.strategy {
            Strategy::Local(loader) => loader.describe(),
            Strategy::Remote(loader) => loader.describe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_auto_prefers_local_when_corpora_dir_exists() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("corpora")).unwrap();
        let loader = ResolvingFileLoader::new(
            CorpusSource::Auto,
            dir.path(),
            RemoteFileLoaderConfig::default(),
        )
        .unwrap();
        assert!(loader.is_local());
    }

    #[test]
    fn test_auto_falls_back_to_remote() {
        let dir = TempDir::new().unwrap();
        let loader = ResolvingFileLoader::new(
            CorpusSource::Auto,
            dir.path(),
            RemoteFileLoaderConfig::default(),
        )
        .unwrap();
        assert!(!loader.is_local());
        assert!(loader.describe().starts_with("remote:"));
    }

    #[test]
    fn test_explicit_local_without_corpora_dir() {
        let dir = TempDir::new().unwrap();
        let loader = ResolvingFileLoader::new(
            CorpusSource::Local,
            dir.path(),
            RemoteFileLoaderConfig::default(),
        )
        .unwrap();
        assert!(loader.is_local());
        assert!(matches!(
            loader.load_file(Path::new("corpora/a/a.csv")),
            Err(FileLoaderError::NotFound(_))
        ));
    }
}
