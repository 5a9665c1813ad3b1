//! Novelstat - 小说语料库词频统计
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel / Corpus: 小说与语料库聚合
//! - Dunning: 对数似然词频比较
//! - Text Tokenizer: 分词与样板剥离
//!
//! 应用层 (application/):
//! - Ports: 端口定义（FileLoader, ResultCache）
//! - Queries: 统计查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 本地 / 远程文件加载
//! - Memory: 内存实现（测试用）
//! - Persistence: gzip 结果缓存

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
