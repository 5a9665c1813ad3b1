//! Dunning Queries

/// 女性作者 vs 男性作者的整体词频比较
#[derive(Debug, Clone, Default)]
pub struct CompareAuthorGenders;

/// 同一语料库中，紧跟 `word1` 的词 vs 紧跟 `word2` 的词
#[derive(Debug, Clone)]
pub struct CompareWordAssociations {
    pub word1: String,
    pub word2: String,
}

impl CompareWordAssociations {
    pub fn new(word1: impl Into<String>, word2: impl Into<String>) -> Self {
        Self {
            word1: word1.into().to_lowercase(),
            word2: word2.into().to_lowercase(),
        }
    }
}

/// 两个语料库中，紧跟同一个 `word` 的词
#[derive(Debug, Clone)]
pub struct CompareWordAssociationAcrossCorpora {
    pub word: String,
    /// 语料 1 的显示名（也用于缓存 key）
    pub corpus1_label: String,
    /// 语料 2 的显示名
    pub corpus2_label: String,
}
