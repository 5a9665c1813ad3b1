//! Frequency Queries

/// 每本小说的代词频率
#[derive(Debug, Clone, Default)]
pub struct GetPronounFrequencies;

/// 每本小说中 `word` 相邻两次出现的间隔
#[derive(Debug, Clone)]
pub struct GetInstanceDistances {
    pub word: String,
}
