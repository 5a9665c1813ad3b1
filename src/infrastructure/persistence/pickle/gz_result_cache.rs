//! Gzip 文件结果缓存
//!
//! 每个条目一个文件: `<base_dir>/pickle_data/<storage_name>.pgz`，
//! 内容为 gzip(bincode(CacheEnvelope))

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{CacheError, CacheKey, ResultCachePort};

const CACHE_SUBDIR: &str = "pickle_data";
const CACHE_EXTENSION: &str = "pgz";

/// 磁盘上的缓存条目
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEnvelope {
    schema_version: u32,
    computation: String,
    fingerprint: String,
    created_at: DateTime<Utc>,
    payload: Vec<u8>,
}

impl CacheEnvelope {
    fn matches(&self, key: &CacheKey) -> bool {
        self.schema_version == key.schema_version()
            && self.computation == key.computation()
            && self.fingerprint == key.fingerprint()
    }
}

/// Gzip 文件缓存
pub struct GzPickleCache {
    cache_dir: PathBuf,
}

impl GzPickleCache {
    /// 在 `base_dir/pickle_data` 下创建缓存
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let cache_dir = base_dir.as_ref().join(CACHE_SUBDIR);
        fs::create_dir_all(&cache_dir).map_err(|e| {
            CacheError::IoError(format!("{}: {}", cache_dir.display(), e))
        })?;

        tracing::info!(cache_dir = %cache_dir.display(), "GzPickleCache initialized");
        Ok(Self { cache_dir })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// 条目对应的文件路径
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", key.storage_name(), CACHE_EXTENSION))
    }

    fn read_envelope(&self, key: &CacheKey) -> Result<CacheEnvelope, CacheError> {
        let path = self.entry_path(key);
        let file = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CacheError::NotFound(path.display().to_string()),
            _ => CacheError::IoError(format!("{}: {}", path.display(), e)),
        })?;

        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut bytes = Vec::new();
        decoder
            .read_to_end(&mut bytes)
            .map_err(|e| CacheError::IoError(format!("{}: {}", path.display(), e)))?;

        // 无法解析的旧格式文件当作过期处理
        bincode::deserialize(&bytes).map_err(|e| {
            CacheError::Stale(format!("{}: undecodable envelope ({})", path.display(), e))
        })
    }
}

fn write_gz(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(bytes)?;
    let mut writer = encoder.finish()?;
    writer.flush()
}

impl ResultCachePort for GzPickleCache {
    fn store_bytes(&self, key: &CacheKey, payload: Vec<u8>) -> Result<(), CacheError> {
        let envelope = CacheEnvelope {
            schema_version: key.schema_version(),
            computation: key.computation().to_string(),
            fingerprint: key.fingerprint().to_string(),
            created_at: Utc::now(),
            payload,
        };
        let encoded = bincode::serialize(&envelope)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;

        let path = self.entry_path(key);
        let tmp_path = path.with_extension(format!("{}.tmp", CACHE_EXTENSION));

        // 先写临时文件，再原子替换；失败时清理临时文件
        let written = write_gz(&tmp_path, &encoded)
            .map_err(|e| CacheError::IoError(format!("{}: {}", tmp_path.display(), e)))
            .and_then(|()| {
                fs::rename(&tmp_path, &path)
                    .map_err(|e| CacheError::IoError(format!("{}: {}", path.display(), e)))
            });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            tracing::warn!(key = %key, error = %e, "Failed to store cache entry");
            return Err(e);
        }

        tracing::info!(
            key = %key,
            path = %path.display(),
            bytes = encoded.len(),
            "Stored cache entry"
        );
        Ok(())
    }

    fn load_bytes(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        let envelope = self.read_envelope(key)?;
        if !envelope.matches(key) {
            tracing::warn!(
                key = %key,
                cached_version = envelope.schema_version,
                cached_fingerprint = %envelope.fingerprint,
                created_at = %envelope.created_at,
                "Stale cache entry"
            );
            return Err(CacheError::Stale(key.to_string()));
        }

        tracing::debug!(key = %key, created_at = %envelope.created_at, "Loaded cache entry");
        Ok(envelope.payload)
    }

    fn exists(&self, key: &CacheKey) -> bool {
        self.entry_path(key).is_file()
    }

    fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CacheError::NotFound(path.display().to_string()))
            }
            Err(e) => Err(CacheError::IoError(format!("{}: {}", path.display(), e))),
        }
    }
}
