//! 应用层错误定义
//!
//! 统一的查询错误类型

use thiserror::Error;

use crate::application::ports::{CacheError, FileLoaderError};
use crate::domain::corpus::CorpusError;
use crate::domain::dunning::DunningError;
use crate::domain::novel::NovelError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 语料库错误
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// 小说错误
    #[error("Novel error: {0}")]
    Novel(#[from] NovelError),

    /// 统计错误
    #[error("Dunning error: {0}")]
    Dunning(#[from] DunningError),

    /// 缓存错误
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// 文件加载错误
    #[error("File loader error: {0}")]
    FileLoader(#[from] FileLoaderError),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
