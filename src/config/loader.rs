//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（novelstat.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::application::ports::CorpusSource;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["novelstat", "novelstat.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `NOVELSTAT_`，层级分隔符 `__`）
/// 2. 配置文件（novelstat.toml 或 novelstat.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `NOVELSTAT_CORPUS__ROOT_DIR=/data/gender_novels`
/// - `NOVELSTAT_CORPUS__SOURCE=remote`
/// - `NOVELSTAT_ANALYSIS__KIND=he_vs_she_associations`
/// - `NOVELSTAT_DUNNING__MIN_COMBINED_COUNT=0`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("corpus.root_dir", ".")?
        .set_default("corpus.source", "auto")?
        .set_default(
            "corpus.remote_base_url",
            "https://raw.githubusercontent.com/dhmit/gender_novels/master",
        )?
        .set_default("corpus.timeout_secs", 60)?
        .set_default("cache.enabled", true)?
        .set_default("cache.base_dir", "data")?
        .set_default("cache.schema_version", 1)?
        .set_default("dunning.min_combined_count", 10)?
        .set_default("dunning.display_terms", 20)?
        .set_default("analysis.corpus_name", "sample_novels")?
        .set_default("analysis.kind", "male_vs_female_authors")?
        .set_default("log.level", "info")?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: NOVELSTAT_CACHE__ENABLED=false
    builder = builder.add_source(
        Environment::with_prefix("NOVELSTAT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.corpus.source == CorpusSource::Remote && config.corpus.remote_base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Remote base URL cannot be empty when source is remote".to_string(),
        ));
    }

    if config.corpus.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Remote timeout cannot be 0".to_string(),
        ));
    }

    if config.cache.schema_version == 0 {
        return Err(ConfigError::ValidationError(
            "Cache schema version cannot be 0".to_string(),
        ));
    }

    if config.analysis.corpus_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Corpus name cannot be empty".to_string(),
        ));
    }

    let kind = config.analysis.kind;
    if kind.needs_word() && config.analysis.word.as_deref().map_or(true, str::is_empty) {
        return Err(ConfigError::ValidationError(format!(
            "analysis.word is required for {}",
            kind.as_str()
        )));
    }

    if kind == super::AnalysisKind::WordAssociation
        && config.analysis.other_word.as_deref().map_or(true, str::is_empty)
    {
        return Err(ConfigError::ValidationError(
            "analysis.other_word is required for word_association".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Corpus Root: {:?}", config.corpus.root_dir);
    tracing::info!("Corpus Source: {}", config.corpus.source.as_str());
    if config.corpus.source != CorpusSource::Local {
        tracing::info!("Remote Base URL: {}", config.corpus.remote_base_url);
        tracing::info!("Remote Timeout: {}s", config.corpus.timeout_secs);
    }
    tracing::info!("Cache Enabled: {}", config.cache.enabled);
    if config.cache.enabled {
        tracing::info!("Cache Directory: {:?}", config.cache.base_dir);
        tracing::info!("Cache Schema Version: {}", config.cache.schema_version);
    }
    tracing::info!("Dunning Min Combined Count: {}", config.dunning.min_combined_count);
    tracing::info!("Analysis: {} on {}", config.analysis.kind.as_str(), config.analysis.corpus_name);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisKind;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.corpus.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_remote_url() {
        let mut config = AppConfig::default();
        config.corpus.source = CorpusSource::Remote;
        config.corpus.remote_base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_schema_version() {
        let mut config = AppConfig::default();
        config.cache.schema_version = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_missing_word() {
        let mut config = AppConfig::default();
        config.analysis.kind = AnalysisKind::InstanceDistance;
        assert!(validate_config(&config).is_err());
        config.analysis.word = Some("her".to_string());
        assert!(validate_config(&config).is_ok());

        config.analysis.kind = AnalysisKind::WordAssociation;
        assert!(validate_config(&config).is_err());
        config.analysis.other_word = Some("his".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[corpus]\nsource = \"local\"\nroot_dir = \"/tmp/novels\"\n\n\
             [analysis]\nkind = \"he_vs_she_associations\"\ncorpus_name = \"gutenberg\"\n\n\
             [dunning]\nmin_combined_count = 0"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.corpus.source, CorpusSource::Local);
        assert_eq!(config.corpus.root_dir, std::path::PathBuf::from("/tmp/novels"));
        assert_eq!(config.analysis.kind, AnalysisKind::HeVsSheAssociations);
        assert_eq!(config.analysis.corpus_name, "gutenberg");
        assert_eq!(config.dunning.min_combined_count, 0);
        assert_eq!(config.cache.base_dir, std::path::PathBuf::from("data"));
    }
}
