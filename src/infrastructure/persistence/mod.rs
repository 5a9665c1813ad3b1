//! Persistence Layer - 数据持久化
//!
//! 分析结果的磁盘缓存实现

pub mod pickle;

pub use self::pickle::GzPickleCache;
