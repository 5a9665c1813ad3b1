//! Pickle Persistence - gzip 文件缓存

mod gz_result_cache;

pub use gz_result_cache::GzPickleCache;
