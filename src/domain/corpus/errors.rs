//! Corpus Context - Errors

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::FileLoaderError;
use crate::domain::novel::NovelError;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("找不到语料库清单文件: {0}")]
    ManifestNotFound(PathBuf),

    #[error("语料库清单解析失败: {0}")]
    ManifestParse(String),

    #[error("作者性别必须是 {supported} 之一，而不是 {value:?}")]
    UnsupportedGender { value: String, supported: String },

    #[error("不支持的元数据字段: {0:?}")]
    UnsupportedField(String),

    #[error("小说 {novel} 缺少元数据字段 \"{field}\"")]
    MissingAttribute { novel: String, field: String },

    #[error("没有符合条件的小说: {0}")]
    NovelNotFound(String),

    #[error(transparent)]
    Novel(#[from] NovelError),

    #[error(transparent)]
    Loader(#[from] FileLoaderError),
}
