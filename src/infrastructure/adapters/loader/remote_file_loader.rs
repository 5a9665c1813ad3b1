//! Remote File Loader - 从远程仓库的 raw 地址获取语料文件
//!
//! GET {base_url}/{relative_path}

use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;

use crate::application::ports::{FileContent, FileKind, FileLoaderError, FileLoaderPort};

/// 默认远程地址
pub const DEFAULT_REMOTE_BASE_URL: &str =
    "https://raw.githubusercontent.com/dhmit/gender_novels/master";

/// 远程加载器配置
#[derive(Debug, Clone)]
pub struct RemoteFileLoaderConfig {
    /// raw 内容基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for RemoteFileLoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl RemoteFileLoaderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 远程文件加载器
pub struct RemoteFileLoader {
    client: Client,
    config: RemoteFileLoaderConfig,
}

impl RemoteFileLoader {
    pub fn new(config: RemoteFileLoaderConfig) -> Result<Self, FileLoaderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FileLoaderError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 文件的远程 URL
    ///
    /// Windows 风格的分隔符统一为 `/`
    pub fn file_url(&self, relative_path: &Path) -> String {
        let relative = relative_path.to_string_lossy().replace('\\', "/");
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

impl FileLoaderPort for RemoteFileLoader {
    fn load_file(&self, relative_path: &Path) -> Result<FileContent, FileLoaderError> {
        let kind = FileKind::from_path(relative_path)?;
        let url = self.file_url(relative_path);

        tracing::debug!(url = %url, "Fetching remote file");

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                FileLoaderError::HttpError(format!("Timed out fetching {}", url))
            } else {
                FileLoaderError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FileLoaderError::NotFound(relative_path.to_path_buf()));
        }
        if !status.is_success() {
            return Err(FileLoaderError::HttpError(format!("HTTP {}: {}", status, url)));
        }

        // text() 按响应声明的 charset 解码
        let raw = response
            .text()
            .map_err(|e| FileLoaderError::DecodeError(e.to_string()))?
            .replace("\r\n", "\n");

        tracing::info!(url = %url, bytes = raw.len(), "Fetched remote file");

        Ok(FileContent::from_raw(kind, raw))
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.config.base_url)
    }
}
