//! Local File Loader - 从本地项目目录读取语料文件

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::application::ports::{FileContent, FileKind, FileLoaderError, FileLoaderPort};

/// 本地文件加载器
///
/// 所有相对路径都以 `root_dir` 为根解析
pub struct LocalFileLoader {
    root_dir: PathBuf,
}

impl LocalFileLoader {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: root_dir.as_ref().to_path_buf(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// 项目根目录下是否存在 `corpora/` 目录
    pub fn has_corpora_dir(root_dir: &Path) -> bool {
        root_dir.join("corpora").is_dir()
    }
}

impl FileLoaderPort for LocalFileLoader {
    fn load_file(&self, relative_path: &Path) -> Result<FileContent, FileLoaderError> {
        let kind = FileKind::from_path(relative_path)?;
        let full_path = self.root_dir.join(relative_path);

        let bytes = std::fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileLoaderError::NotFound(full_path.clone()),
            _ => FileLoaderError::IoError(format!("{}: {}", full_path.display(), e)),
        })?;

        let raw = String::from_utf8(bytes).map_err(|e| {
            FileLoaderError::DecodeError(format!("{}: {}", full_path.display(), e))
        })?;

        tracing::debug!(
            path = %full_path.display(),
            kind = kind.as_str(),
            bytes = raw.len(),
            "Loaded local file"
        );

        Ok(FileContent::from_raw(kind, raw))
    }

    fn describe(&self) -> String {
        format!("local:{}", self.root_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_txt_and_csv() {
        let dir = TempDir::new().unwrap();
        let texts = dir.path().join("corpora/sample/texts");
        std::fs::create_dir_all(&texts).unwrap();
        std::fs::write(texts.join("a.txt"), "Line one.\nLine two.\n").unwrap();
        std::fs::write(
            dir.path().join("corpora/sample/sample.csv"),
            "author,date\n\"Austen, Jane\",1818\n",
        )
        .unwrap();

        let loader = LocalFileLoader::new(dir.path());
        assert!(LocalFileLoader::has_corpora_dir(dir.path()));

        let text = loader
            .load_text(Path::new("corpora/sample/texts/a.txt"))
            .unwrap();
        assert_eq!(text, "Line one.\nLine two.\n");

        let lines = loader
            .load_lines(Path::new("corpora/sample/sample.csv"))
            .unwrap();
        assert_eq!(lines, vec!["author,date", "\"Austen, Jane\",1818"]);
    }

    #[test]
    fn test_missing_file_reports_full_path() {
        let dir = TempDir::new().unwrap();
        let loader = LocalFileLoader::new(dir.path());
        match loader.load_file(Path::new("corpora/x/texts/missing.txt")) {
            Err(FileLoaderError::NotFound(path)) => {
                assert_eq!(path, dir.path().join("corpora/x/texts/missing.txt"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let loader = LocalFileLoader::new(dir.path());
        assert!(matches!(
            loader.load_file(Path::new("corpora/x/data.json")),
            Err(FileLoaderError::UnsupportedFileType(ref ext)) if ext == ".json"
        ));
    }
}
