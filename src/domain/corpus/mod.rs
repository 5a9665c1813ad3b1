//! Corpus Context - 语料库限界上下文
//!
//! 职责:
//! - 从 CSV 清单加载小说集合
//! - 按元数据过滤、合并
//! - 语料库级词频汇总

mod aggregate;
mod errors;

pub use aggregate::Corpus;
pub use errors::CorpusError;
