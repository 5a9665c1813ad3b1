//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 元数据校验（清单行 → NovelMetadata）
//! - 正文惰性加载与样板剥离
//! - 单本小说的词频统计

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::Novel;
pub use errors::NovelError;
pub use value_objects::{parse_year, AuthorGender, MetadataField, NovelMetadata, NovelRecord};
