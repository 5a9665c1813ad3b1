//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod file_loader;
mod result_cache;

pub use file_loader::{CorpusSource, FileContent, FileKind, FileLoaderError, FileLoaderPort};
pub use result_cache::{
    generate_fingerprint, load_or_compute, load_pickle, store_pickle, CacheError, CacheKey,
    ResultCachePort, CACHE_SCHEMA_VERSION,
};
