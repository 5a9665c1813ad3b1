//! 应用层 - 查询（读操作）
//!
//! 语料库上的统计分析

mod dunning_queries;
mod frequency_queries;

pub mod handlers;

pub use dunning_queries::*;
pub use frequency_queries::*;
