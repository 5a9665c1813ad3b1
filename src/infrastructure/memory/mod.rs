//! Memory Layer - In-Memory Adapters
//!
//! FileLoaderPort 与 ResultCachePort 的内存实现，不触碰磁盘和网络

mod file_loader;
mod result_cache;

pub use file_loader::InMemoryFileLoader;
pub use result_cache::InMemoryResultCache;
