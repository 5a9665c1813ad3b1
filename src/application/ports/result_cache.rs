//! Result Cache Port - 分析结果缓存
//!
//! 定义昂贵聚合计算（Dunning 对比等）的磁盘缓存抽象。
//! 缓存 key 由 计算标识 + 输入指纹 + schema 版本 组成，
//! 旧版本或不同输入写下的条目在读取时被识别为 `Stale`。

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// 当前缓存 schema 版本
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Result Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache entry not found: {0}")]
    NotFound(String),

    #[error("Stale cache entry: {0}")]
    Stale(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl CacheError {
    /// 读穿透场景下可以视为未命中的错误
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound(_) | CacheError::Stale(_))
    }
}

/// 缓存 key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// 计算标识，例如 `dunning_he_vs_she_associated_words_gutenberg`
    computation: String,
    /// 输入指纹（md5 hex）
    fingerprint: String,
    /// schema 版本
    schema_version: u32,
}

impl CacheKey {
    pub fn new(computation: impl Into<String>) -> Self {
        Self {
            computation: computation.into(),
            fingerprint: String::new(),
            schema_version: CACHE_SCHEMA_VERSION,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }

    pub fn with_schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    pub fn computation(&self) -> &str {
        &self.computation
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// 文件名安全的存储名
    ///
    /// 非 `[A-Za-z0-9_.-]` 字符替换为 `_`
    pub fn storage_name(&self) -> String {
        self.computation
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@v{}#{}",
            self.computation, self.schema_version, self.fingerprint
        )
    }
}

/// Result Cache Port
///
/// 字节级接口，类型化读写见 [`store_pickle`] / [`load_pickle`]
pub trait ResultCachePort: Send + Sync {
    /// 写入缓存条目（覆盖同名条目）
    fn store_bytes(&self, key: &CacheKey, payload: Vec<u8>) -> Result<(), CacheError>;

    /// 读取缓存条目
    ///
    /// - 不存在 → `NotFound`
    /// - schema 版本或指纹不匹配 → `Stale`
    fn load_bytes(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError>;

    /// 检查缓存是否存在（不校验指纹）
    fn exists(&self, key: &CacheKey) -> bool;

    /// 删除缓存条目
    fn remove(&self, key: &CacheKey) -> Result<(), CacheError>;
}

/// 序列化并写入缓存
pub fn store_pickle<T: Serialize>(
    cache: &dyn ResultCachePort,
    key: &CacheKey,
    value: &T,
) -> Result<(), CacheError> {
    let payload =
        bincode::serialize(value).map_err(|e| CacheError::SerializationError(e.to_string()))?;
    cache.store_bytes(key, payload)
}

/// 读取并反序列化缓存
pub fn load_pickle<T: DeserializeOwned>(
    cache: &dyn ResultCachePort,
    key: &CacheKey,
) -> Result<T, CacheError> {
    let payload = cache.load_bytes(key)?;
    bincode::deserialize(&payload).map_err(|e| CacheError::SerializationError(e.to_string()))
}

/// 读穿透：命中直接返回，未命中（或过期）时计算并写回
///
/// 写回失败只记录告警，计算结果照常返回。
pub fn load_or_compute<T, E, F>(
    cache: &dyn ResultCachePort,
    key: &CacheKey,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    E: From<CacheError>,
    F: FnOnce() -> Result<T, E>,
{
    match load_pickle::<T>(cache, key) {
        Ok(value) => {
            tracing::debug!(key = %key, "Result cache hit");
            return Ok(value);
        }
        Err(e) if e.is_miss() => {
            tracing::info!(key = %key, reason = %e, "Result cache miss, computing");
        }
        Err(e) => return Err(e.into()),
    }

    let value = compute()?;
    if let Err(e) = store_pickle(cache, key, &value) {
        tracing::warn!(key = %key, error = %e, "Failed to store computed result");
    }
    Ok(value)
}

/// 生成输入指纹
///
/// 对各部分依次做 md5，部分之间以 `\0` 分隔避免拼接歧义
pub fn generate_fingerprint<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut context = md5::Context::new();
    for part in parts {
        context.consume(part.as_ref());
        context.consume([0u8]);
    }
    format!("{:x}", context.compute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_name_sanitized() {
        let key = CacheKey::new("dunning_fem aut_vs_male/aut");
        assert_eq!(key.storage_name(), "dunning_fem_aut_vs_male_aut");
    }

    #[test]
    fn test_fingerprint_is_deterministic_and_separated() {
        let a = generate_fingerprint(["ab", "c"]);
        let b = generate_fingerprint(["ab", "c"]);
        let c = generate_fingerprint(["a", "bc"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn test_cache_error_miss_classification() {
        assert!(CacheError::NotFound("k".into()).is_miss());
        assert!(CacheError::Stale("k".into()).is_miss());
        assert!(!CacheError::IoError("disk".into()).is_miss());
    }
}
