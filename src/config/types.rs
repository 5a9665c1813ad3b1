//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::ports::{CorpusSource, CACHE_SCHEMA_VERSION};
use crate::domain::dunning::DEFAULT_MIN_COMBINED_COUNT;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 语料来源配置
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// 结果缓存配置
    #[serde(default)]
    pub cache: CacheConfig,

    /// Dunning 比较配置
    #[serde(default)]
    pub dunning: DunningConfig,

    /// 分析任务配置
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 语料来源配置
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// 项目根目录（其下应有 `corpora/`）
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// auto / local / remote
    #[serde(default)]
    pub source: CorpusSource,

    /// 远程 raw 内容基础 URL
    #[serde(default = "default_remote_base_url")]
    pub remote_base_url: String,

    /// 远程请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_remote_base_url() -> String {
    "https://raw.githubusercontent.com/dhmit/gender_novels/master".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            source: CorpusSource::default(),
            remote_base_url: default_remote_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// 结果缓存配置
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// 是否启用缓存，关闭时每次重新计算
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// 缓存根目录，条目位于 `<base_dir>/pickle_data/`
    #[serde(default = "default_cache_dir")]
    pub base_dir: PathBuf,

    /// schema 版本，修改后旧条目全部视为过期
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_schema_version() -> u32 {
    CACHE_SCHEMA_VERSION
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            base_dir: default_cache_dir(),
            schema_version: default_schema_version(),
        }
    }
}

/// Dunning 比较配置
#[derive(Debug, Clone, Deserialize)]
pub struct DunningConfig {
    /// 两侧合计次数低于此值的词不参与比较，0 表示不过滤
    #[serde(default = "default_min_combined_count")]
    pub min_combined_count: u64,

    /// 每侧输出的词数
    #[serde(default = "default_display_terms")]
    pub display_terms: usize,
}

fn default_min_combined_count() -> u64 {
    DEFAULT_MIN_COMBINED_COUNT
}

fn default_display_terms() -> usize {
    20
}

impl Default for DunningConfig {
    fn default() -> Self {
        Self {
            min_combined_count: default_min_combined_count(),
            display_terms: default_display_terms(),
        }
    }
}

/// 分析类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    /// 女性作者 vs 男性作者的整体词频
    #[default]
    MaleVsFemaleAuthors,
    /// 紧跟 she 的词 vs 紧跟 he 的词
    HeVsSheAssociations,
    /// 紧跟 `word` 的词 vs 紧跟 `other_word` 的词
    WordAssociation,
    /// 紧跟 `word` 的词：女性作者 vs 男性作者
    WordAssociationByAuthorGender,
    /// 每本小说的女性代词相对频率
    PronounFrequency,
    /// 每本小说中 `word` 相邻两次出现的间隔
    InstanceDistance,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::MaleVsFemaleAuthors => "male_vs_female_authors",
            AnalysisKind::HeVsSheAssociations => "he_vs_she_associations",
            AnalysisKind::WordAssociation => "word_association",
            AnalysisKind::WordAssociationByAuthorGender => "word_association_by_author_gender",
            AnalysisKind::PronounFrequency => "pronoun_frequency",
            AnalysisKind::InstanceDistance => "instance_distance",
        }
    }

    /// 是否需要 `analysis.word`
    pub fn needs_word(&self) -> bool {
        matches!(
            self,
            AnalysisKind::WordAssociation
                | AnalysisKind::WordAssociationByAuthorGender
                | AnalysisKind::InstanceDistance
        )
    }
}

/// 分析任务配置
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// 语料库名称（`corpora/<name>/<name>.csv`）
    #[serde(default = "default_corpus_name")]
    pub corpus_name: String,

    #[serde(default)]
    pub kind: AnalysisKind,

    /// 检索词
    #[serde(default)]
    pub word: Option<String>,

    /// 对比词（仅 word_association）
    #[serde(default)]
    pub other_word: Option<String>,

    /// 结果 JSON 输出路径
    #[serde(default)]
    pub output_json: Option<PathBuf>,
}

fn default_corpus_name() -> String {
    "sample_novels".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            corpus_name: default_corpus_name(),
            kind: AnalysisKind::default(),
            word: None,
            other_word: None,
            output_json: None,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
