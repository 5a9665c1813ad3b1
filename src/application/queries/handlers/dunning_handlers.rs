//! Dunning Query Handlers
//!
//! 比较结果通过 ResultCachePort 读穿透缓存

use serde::Serialize;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    generate_fingerprint, load_or_compute, load_pickle, store_pickle, CacheKey, ResultCachePort,
    CACHE_SCHEMA_VERSION,
};
use crate::application::queries::{
    CompareAuthorGenders, CompareWordAssociationAcrossCorpora, CompareWordAssociations,
};
use crate::domain::corpus::Corpus;
use crate::domain::dunning::{dunning_total, DunningParams, DunningResult};
use crate::domain::WordCounter;

// ============================================================================
// Response DTOs
// ============================================================================

/// 一次比较的完整结果
#[derive(Debug, Clone, Serialize)]
pub struct DunningComparison {
    /// 计算标识（缓存 key）
    pub computation: String,
    pub corpus1_label: String,
    pub corpus2_label: String,
    pub min_combined_count: u64,
    pub result: DunningResult,
}

// ============================================================================
// Handler
// ============================================================================

/// Dunning 比较查询处理器
pub struct DunningQueryHandler {
    cache: Option<Arc<dyn ResultCachePort>>,
    params: DunningParams,
    schema_version: u32,
}

impl DunningQueryHandler {
    pub fn new(cache: Option<Arc<dyn ResultCachePort>>, params: DunningParams) -> Self {
        Self {
            cache,
            params,
            schema_version: CACHE_SCHEMA_VERSION,
        }
    }

    pub fn with_schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// 缓存 key：指纹覆盖输入语料、查询参数和最小合计次数
    fn cache_key(&self, computation: String, inputs: &[&str]) -> CacheKey {
        let min_count = self.params.min_combined_count.to_string();
        let fingerprint = generate_fingerprint(
            inputs
                .iter()
                .copied()
                .chain(std::iter::once(min_count.as_str())),
        );
        CacheKey::new(computation)
            .with_fingerprint(fingerprint)
            .with_schema_version(self.schema_version)
    }

    fn compute_cached<F>(
        &self,
        key: &CacheKey,
        compute: F,
    ) -> Result<DunningResult, ApplicationError>
    where
        F: FnOnce() -> Result<DunningResult, ApplicationError>,
    {
        match &self.cache {
            Some(cache) => load_or_compute(cache.as_ref(), key, compute),
            None => compute(),
        }
    }

    fn compare(
        &self,
        counter1: &WordCounter,
        counter2: &WordCounter,
    ) -> Result<DunningResult, ApplicationError> {
        Ok(dunning_total(counter1, counter2, &self.params)?)
    }

    fn comparison(
        &self,
        key: &CacheKey,
        corpus1_label: &str,
        corpus2_label: &str,
        result: DunningResult,
    ) -> DunningComparison {
        DunningComparison {
            computation: key.computation().to_string(),
            corpus1_label: corpus1_label.to_string(),
            corpus2_label: corpus2_label.to_string(),
            min_combined_count: self.params.min_combined_count,
            result,
        }
    }

    /// 女性作者（语料 1）vs 男性作者（语料 2）
    pub fn compare_author_genders(
        &self,
        corpus: &Corpus,
        _query: CompareAuthorGenders,
    ) -> Result<DunningComparison, ApplicationError> {
        let fingerprint = corpus.fingerprint();
        let key = self.cache_key(
            format!("dunning_male_vs_female_authors_{}", corpus.name()),
            &[fingerprint.as_str()],
        );

        tracing::info!(corpus = %corpus.name(), key = %key, "Comparing author genders");

        let result = self.compute_cached(&key, || {
            let female = corpus.filter_by_gender("female")?.get_wordcount_counter()?;
            let male = corpus.filter_by_gender("male")?.get_wordcount_counter()?;
            self.compare(&female, &male)
        })?;

        Ok(self.comparison(&key, "Fem Author", "Male Author", result))
    }

    /// 紧跟 `word1`（语料 1）vs 紧跟 `word2`（语料 2）的词
    ///
    /// 以相反顺序缓存过的结果会交换两侧后复用
    pub fn compare_word_associations(
        &self,
        corpus: &Corpus,
        query: CompareWordAssociations,
    ) -> Result<DunningComparison, ApplicationError> {
        let CompareWordAssociations { word1, word2 } = query;
        if word1.is_empty() || word2.is_empty() {
            return Err(ApplicationError::validation("association words cannot be empty"));
        }

        let fingerprint = corpus.fingerprint();
        let key = self.cache_key(
            format!("dunning_{}_vs_{}_associated_words_{}", word1, word2, corpus.name()),
            &[fingerprint.as_str(), word1.as_str(), word2.as_str()],
        );
        let reversed_key = self.cache_key(
            format!("dunning_{}_vs_{}_associated_words_{}", word2, word1, corpus.name()),
            &[fingerprint.as_str(), word2.as_str(), word1.as_str()],
        );

        let label1 = format!("{}...", word1);
        let label2 = format!("{}...", word2);

        if let Some(cache) = &self.cache {
            match load_pickle::<DunningResult>(cache.as_ref(), &key) {
                Ok(result) => {
                    tracing::debug!(key = %key, "Result cache hit");
                    return Ok(self.comparison(&key, &label1, &label2, result));
                }
                Err(e) if e.is_miss() => {}
                Err(e) => return Err(e.into()),
            }
            match load_pickle::<DunningResult>(cache.as_ref(), &reversed_key) {
                Ok(result) => {
                    tracing::info!(key = %reversed_key, "Reusing reversed comparison");
                    return Ok(self.comparison(&key, &label1, &label2, result.swapped()));
                }
                Err(e) if e.is_miss() => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(
            corpus = %corpus.name(),
            word1 = %word1,
            word2 = %word2,
            "Comparing word associations"
        );

        let mut counter1 = WordCounter::new();
        let mut counter2 = WordCounter::new();
        for novel in corpus {
            counter1 += &novel.words_associated(&word1)?;
            counter2 += &novel.words_associated(&word2)?;
        }
        let result = self.compare(&counter1, &counter2)?;

        if let Some(cache) = &self.cache {
            if let Err(e) = store_pickle(cache.as_ref(), &key, &result) {
                tracing::warn!(key = %key, error = %e, "Failed to store computed result");
            }
        }

        Ok(self.comparison(&key, &label1, &label2, result))
    }

    /// 紧跟同一个词的词：语料 1 vs 语料 2
    pub fn compare_word_association_across_corpora(
        &self,
        corpus1: &Corpus,
        corpus2: &Corpus,
        query: CompareWordAssociationAcrossCorpora,
    ) -> Result<DunningComparison, ApplicationError> {
        let word = query.word.to_lowercase();
        if word.is_empty() {
            return Err(ApplicationError::validation("association word cannot be empty"));
        }

        let fingerprint1 = corpus1.fingerprint();
        let fingerprint2 = corpus2.fingerprint();
        let key = self.cache_key(
            format!(
                "dunning_{}_associated_words_{}_vs_{}_in_{}",
                word,
                query.corpus1_label,
                query.corpus2_label,
                corpus1.name()
            ),
            &[fingerprint1.as_str(), fingerprint2.as_str(), word.as_str()],
        );

        tracing::info!(
            word = %word,
            corpus1 = %query.corpus1_label,
            corpus2 = %query.corpus2_label,
            key = %key,
            "Comparing word association across corpora"
        );

        let result = self.compute_cached(&key, || {
            let mut counter1 = WordCounter::new();
            for novel in corpus1 {
                counter1 += &novel.words_associated(&word)?;
            }
            let mut counter2 = WordCounter::new();
            for novel in corpus2 {
                counter2 += &novel.words_associated(&word)?;
            }
            self.compare(&counter1, &counter2)
        })?;

        let label1 = format!("{}. {}", query.corpus1_label, word);
        let label2 = format!("{}. {}", query.corpus2_label, word);
        Ok(self.comparison(&key, &label1, &label2, result))
    }
}
