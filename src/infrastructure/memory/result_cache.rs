//! In-Memory Result Cache Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{CacheError, CacheKey, ResultCachePort};

struct Entry {
    computation: String,
    schema_version: u32,
    fingerprint: String,
    payload: Vec<u8>,
}

/// 内存结果缓存
///
/// 与磁盘缓存相同的 key 语义：按计算标识存储，读取时校验计算标识、版本与指纹
pub struct InMemoryResultCache {
    entries: DashMap<String, Entry>,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCachePort for InMemoryResultCache {
    fn store_bytes(&self, key: &CacheKey, payload: Vec<u8>) -> Result<(), CacheError> {
        self.entries.insert(
            key.storage_name(),
            Entry {
                computation: key.computation().to_string(),
                schema_version: key.schema_version(),
                fingerprint: key.fingerprint().to_string(),
                payload,
            },
        );
        tracing::debug!(key = %key, "Cache entry stored in memory");
        Ok(())
    }

    fn load_bytes(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        let entry = self
            .entries
            .get(&key.storage_name())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        if entry.computation != key.computation()
            || entry.schema_version != key.schema_version()
            || entry.fingerprint != key.fingerprint()
        {
            return Err(CacheError::Stale(key.to_string()));
        }
        Ok(entry.payload.clone())
    }

    fn exists(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(&key.storage_name())
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries
            .remove(&key.storage_name())
            .map(|_| ())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }
}
