//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Novel Context: 单本小说
//! - Corpus Context: 小说集合
//!
//! 以及共享的文本处理、词频计数与 Dunning 引擎

pub mod corpus;
pub mod dunning;
pub mod novel;
pub mod text_tokenizer;

mod word_counter;

pub use word_counter::WordCounter;
