//! Novel Context - Errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NovelError {
    #[error("缺少必填元数据字段 \"{field}\": {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("出版年份必须是四位数字，而不是 {0:?}")]
    InvalidDate(String),

    #[error("作者姓氏应以大写字母开头: {0:?}")]
    InvalidAuthor(String),

    #[error("不支持的作者性别 {0:?}，可选值: female, male, non-binary, unknown, both")]
    InvalidAuthorGender(String),

    #[error("小说文件名应以 .txt 结尾: {0:?}")]
    InvalidFilename(String),

    #[error("找不到小说正文文件: {0}")]
    TextNotFound(PathBuf),

    #[error("正文加载失败: {0}")]
    LoadError(String),

    #[error("小说没有任何词，无法计算词频: {0}")]
    ZeroWordCount(String),
}
