//! File Loader Port - 语料文件访问
//!
//! 定义语料文件（CSV 清单、TXT 正文）的读取接口。
//! 本地读取、远程回退等策略由 infrastructure/adapters 实现，
//! 通过 `Arc<dyn FileLoaderPort>` 注入 Novel / Corpus。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File Loader 错误
#[derive(Debug, Error)]
pub enum FileLoaderError {
    #[error("Unsupported file type '{0}': only .csv and .txt files can be loaded")]
    UnsupportedFileType(String),

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),
}

/// 支持的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Txt,
}

impl FileKind {
    /// 根据扩展名判断文件类型
    pub fn from_path(path: &Path) -> Result<Self, FileLoaderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match ext {
            "csv" => Ok(FileKind::Csv),
            "txt" => Ok(FileKind::Txt),
            other => Err(FileLoaderError::UnsupportedFileType(format!(".{}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Txt => "txt",
        }
    }
}

/// 加载结果
///
/// - `.txt` → 完整文本
/// - `.csv` → 按行拆分（不含换行符）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Lines(Vec<String>),
}

impl FileContent {
    /// 按文件类型包装原始文本
    pub fn from_raw(kind: FileKind, raw: String) -> Self {
        match kind {
            FileKind::Txt => FileContent::Text(raw),
            FileKind::Csv => FileContent::Lines(raw.lines().map(str::to_string).collect()),
        }
    }

    /// 合并为单个字符串（CSV 行以 `\n` 连接）
    pub fn into_text(self) -> String {
        match self {
            FileContent::Text(text) => text,
            FileContent::Lines(lines) => lines.join("\n"),
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            FileContent::Text(text) => text.lines().map(str::to_string).collect(),
            FileContent::Lines(lines) => lines,
        }
    }
}

/// 语料来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusSource {
    /// `root_dir/corpora` 存在时读本地，否则远程
    #[default]
    Auto,
    Local,
    Remote,
}

impl CorpusSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorpusSource::Auto => "auto",
            CorpusSource::Local => "local",
            CorpusSource::Remote => "remote",
        }
    }
}

/// File Loader Port
///
/// 路径均为相对于项目根目录的相对路径，例如
/// `corpora/sample_novels/sample_novels.csv`。
pub trait FileLoaderPort: Send + Sync {
    /// 读取文件，返回值形态由扩展名决定
    fn load_file(&self, relative_path: &Path) -> Result<FileContent, FileLoaderError>;

    /// 读取为单个字符串
    fn load_text(&self, relative_path: &Path) -> Result<String, FileLoaderError> {
        self.load_file(relative_path).map(FileContent::into_text)
    }

    /// 读取为行列表
    fn load_lines(&self, relative_path: &Path) -> Result<Vec<String>, FileLoaderError> {
        self.load_file(relative_path).map(FileContent::into_lines)
    }

    /// 适配器名称（日志用）
    fn describe(&self) -> String;
}
