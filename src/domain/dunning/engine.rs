//! Dunning 对数似然比较

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};
use thiserror::Error;

use super::chi_square::chi_square_sf_1dof;
use crate::domain::WordCounter;

/// 默认的最小合计次数
pub const DEFAULT_MIN_COMBINED_COUNT: u64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DunningError {
    #[error("{0} 的总词数为 0，无法比较")]
    EmptyCounter(&'static str),
}

/// 比较参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunningParams {
    /// 两侧合计次数低于此值的词不参与比较，0 表示不过滤
    pub min_combined_count: u64,
}

impl Default for DunningParams {
    fn default() -> Self {
        Self {
            min_combined_count: DEFAULT_MIN_COMBINED_COUNT,
        }
    }
}

/// 单个词的比较结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordScore {
    /// 正数偏向语料 1，负数偏向语料 2
    pub dunning: f64,
    pub p_value: f64,
    pub count_total: u64,
    pub count_corp1: u64,
    pub count_corp2: u64,
    pub freq_total: f64,
    pub freq_corp1: f64,
    pub freq_corp2: f64,
}

impl WordScore {
    /// 交换两侧
    pub fn swapped(&self) -> Self {
        Self {
            dunning: -self.dunning,
            p_value: self.p_value,
            count_total: self.count_total,
            count_corp1: self.count_corp2,
            count_corp2: self.count_corp1,
            freq_total: self.freq_total,
            freq_corp1: self.freq_corp2,
            freq_corp2: self.freq_corp1,
        }
    }
}

/// 词 → 比较结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DunningResult {
    scores: BTreeMap<String, WordScore>,
}

impl DunningResult {
    pub fn get(&self, word: &str) -> Option<&WordScore> {
        self.scores.get(word)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, WordScore> {
        self.scores.iter()
    }

    /// 按分数降序：最偏向语料 1 的词在前
    pub fn ranked_for_corpus1(&self) -> Vec<(&str, &WordScore)> {
        self.ranked(|a, b| b.total_cmp(a))
    }

    /// 按分数升序：最偏向语料 2 的词在前
    pub fn ranked_for_corpus2(&self) -> Vec<(&str, &WordScore)> {
        self.ranked(|a, b| a.total_cmp(b))
    }

    fn ranked<F>(&self, order: F) -> Vec<(&str, &WordScore)>
    where
        F: Fn(&f64, &f64) -> Ordering,
    {
        let mut entries: Vec<(&str, &WordScore)> =
            self.scores.iter().map(|(w, s)| (w.as_str(), s)).collect();
        entries.sort_by(|a, b| order(&a.1.dunning, &b.1.dunning).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// 两侧互换后的结果，等价于交换参数重新计算
    pub fn swapped(&self) -> Self {
        Self {
            scores: self
                .scores
                .iter()
                .map(|(w, s)| (w.clone(), s.swapped()))
                .collect(),
        }
    }
}

impl FromIterator<(String, WordScore)> for DunningResult {
    fn from_iter<I: IntoIterator<Item = (String, WordScore)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// `x * ln(x / expected)`，x 为 0 时取极限 0
fn observed_term(observed: f64, expected: f64) -> f64 {
    if observed == 0.0 {
        0.0
    } else {
        observed * (observed / expected).ln()
    }
}

/// 单个词的 Dunning 对数似然值
///
/// - `total_corpus_1`/`total_corpus_2`: 两侧总词数 c、d
/// - `count_corpus_1`/`count_corpus_2`: 该词在两侧的次数 a、b
///
/// 符号由 a/c 与 b/d 的精确比较决定：语料 1 中更频繁为正，相同为 0
pub fn dunn_individual_word(
    total_corpus_1: u64,
    total_corpus_2: u64,
    count_corpus_1: u64,
    count_corpus_2: u64,
) -> f64 {
    let (a, b, c, d) = (count_corpus_1, count_corpus_2, total_corpus_1, total_corpus_2);
    if c == 0 || d == 0 {
        return 0.0;
    }

    // a·d 与 b·c 的整数比较，避免浮点误差导致符号抖动
    let lhs = a as u128 * d as u128;
    let rhs = b as u128 * c as u128;
    let sign = match lhs.cmp(&rhs) {
        Ordering::Greater => 1.0,
        Ordering::Less => -1.0,
        Ordering::Equal => return 0.0,
    };

    let (a, b, c, d) = (a as f64, b as f64, c as f64, d as f64);
    let e1 = c * (a + b) / (c + d);
    let e2 = d * (a + b) / (c + d);
    let g = 2.0 * (observed_term(a, e1) + observed_term(b, e2));

    sign * g.max(0.0)
}

/// 对两侧都出现且合计次数达到阈值的词计算 Dunning 结果
pub fn dunning_total(
    counter1: &WordCounter,
    counter2: &WordCounter,
    params: &DunningParams,
) -> Result<DunningResult, DunningError> {
    let total1 = counter1.total();
    let total2 = counter2.total();
    if total1 == 0 {
        return Err(DunningError::EmptyCounter("corpus 1"));
    }
    if total2 == 0 {
        return Err(DunningError::EmptyCounter("corpus 2"));
    }

    let grand_total = (total1 + total2) as f64;
    let mut scores = BTreeMap::new();
    for (word, &count1) in counter1 {
        let count2 = counter2.get(word);
        if count1 == 0 || count2 == 0 {
            continue;
        }
        let combined = count1 + count2;
        if combined < params.min_combined_count {
            continue;
        }

        let dunning = dunn_individual_word(total1, total2, count1, count2);
        scores.insert(
            word.clone(),
            WordScore {
                dunning,
                p_value: chi_square_sf_1dof(dunning),
                count_total: combined,
                count_corp1: count1,
                count_corp2: count2,
                freq_total: combined as f64 / grand_total,
                freq_corp1: count1 as f64 / total1 as f64,
                freq_corp2: count2 as f64 / total2 as f64,
            },
        );
    }

    tracing::debug!(
        total1,
        total2,
        shared_words = scores.len(),
        min_combined_count = params.min_combined_count,
        "Dunning comparison finished"
    );
    Ok(DunningResult { scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(entries: &[(&str, u64)]) -> WordCounter {
        entries.iter().map(|(w, c)| (*w, *c)).collect()
    }

    fn female_counter() -> WordCounter {
        counter(&[("he", 1), ("she", 10), ("and", 10)])
    }

    fn male_counter() -> WordCounter {
        counter(&[("he", 10), ("she", 1), ("and", 10)])
    }

    #[test]
    fn test_dunn_individual_word() {
        let score = dunn_individual_word(8_648_489, 8_700_765, 50, 1000);
        assert!((score - -1047.8610274053995).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_dunn_individual_word_equal_rates_scores_zero() {
        assert_eq!(dunn_individual_word(100, 200, 5, 10), 0.0);
    }

    #[test]
    fn test_dunn_individual_word_zero_count_is_finite() {
        let score = dunn_individual_word(100, 100, 0, 10);
        assert!(score.is_finite());
        assert!(score < 0.0);
    }

    #[test]
    fn test_dunning_total_statistics() {
        let result =
            dunning_total(&female_counter(), &male_counter(), &DunningParams::default()).unwrap();

        let he = result.get("he").unwrap();
        assert!((he.dunning - -8.547243830635558).abs() < 1e-9);
        assert_eq!((he.count_total, he.count_corp1, he.count_corp2), (11, 1, 10));
        assert!((he.freq_total - 0.2619047619047619).abs() < 1e-15);
        assert!((he.freq_corp1 - 0.047619047619047616).abs() < 1e-15);
        assert!((he.freq_corp2 - 0.47619047619047616).abs() < 1e-15);
        assert!(he.p_value < 0.01);

        assert_eq!(result.get("and").unwrap().dunning, 0.0);
    }

    #[test]
    fn test_first_corpus_overrepresentation_is_positive() {
        let result =
            dunning_total(&male_counter(), &female_counter(), &DunningParams::default()).unwrap();
        assert!((result.get("he").unwrap().dunning - 8.547243830635558).abs() < 1e-9);
        assert!(result.get("she").unwrap().dunning < 0.0);
        assert!(result.get("and").unwrap().dunning.abs() < 1e-12);
    }

    #[test]
    fn test_sign_flips_under_argument_swap() {
        let params = DunningParams::default();
        let forward = dunning_total(&female_counter(), &male_counter(), &params).unwrap();
        let backward = dunning_total(&male_counter(), &female_counter(), &params).unwrap();
        for (word, score) in forward.iter() {
            assert_eq!(score.dunning, -backward.get(word).unwrap().dunning);
        }
        assert_eq!(forward.swapped(), backward);
    }

    #[test]
    fn test_min_combined_count_cutoff() {
        let a = counter(&[("rare", 2), ("common", 40)]);
        let b = counter(&[("rare", 3), ("common", 60), ("only_b", 50)]);

        let filtered = dunning_total(&a, &b, &DunningParams::default()).unwrap();
        assert!(filtered.get("rare").is_none());
        assert!(filtered.get("common").is_some());
        assert!(filtered.get("only_b").is_none());

        let unfiltered =
            dunning_total(&a, &b, &DunningParams { min_combined_count: 0 }).unwrap();
        assert!(unfiltered.get("rare").is_some());
        assert_eq!(unfiltered.len(), 2);
    }

    #[test]
    fn test_empty_counter_rejected() {
        let err = dunning_total(&WordCounter::new(), &male_counter(), &DunningParams::default())
            .unwrap_err();
        assert_eq!(err, DunningError::EmptyCounter("corpus 1"));
        let err = dunning_total(&male_counter(), &WordCounter::new(), &DunningParams::default())
            .unwrap_err();
        assert_eq!(err, DunningError::EmptyCounter("corpus 2"));
    }

    #[test]
    fn test_ranking() {
        let result =
            dunning_total(&female_counter(), &male_counter(), &DunningParams::default()).unwrap();
        let words1: Vec<&str> = result.ranked_for_corpus1().iter().map(|(w, _)| *w).collect();
        let words2: Vec<&str> = result.ranked_for_corpus2().iter().map(|(w, _)| *w).collect();
        assert_eq!(words1, vec!["she", "and", "he"]);
        assert_eq!(words2, vec!["he", "and", "she"]);
    }
}
