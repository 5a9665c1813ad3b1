//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（FileLoader、ResultCache）
//! - queries: 统计查询及处理器
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use error::ApplicationError;

pub use ports::{
    // File loader
    CorpusSource,
    FileContent,
    FileKind,
    FileLoaderError,
    FileLoaderPort,
    // Result cache
    generate_fingerprint,
    load_or_compute,
    load_pickle,
    store_pickle,
    CacheError,
    CacheKey,
    ResultCachePort,
    CACHE_SCHEMA_VERSION,
};

pub use queries::{
    // Dunning queries
    CompareAuthorGenders,
    CompareWordAssociationAcrossCorpora,
    CompareWordAssociations,
    // Frequency queries
    GetInstanceDistances,
    GetPronounFrequencies,
    // Handlers
    handlers::{
        get_comparative_word_freq, DunningComparison, DunningQueryHandler, FrequencyQueryHandler,
        InstanceDistanceReport, PronounFrequencyReport,
    },
};
