//! 词频计数器
//!
//! 词 → 出现次数 的映射，Novel / Corpus 级别的词分布都用它表示

use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};
use std::ops::{Add, AddAssign};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCounter {
    counts: HashMap<String, u64>,
}

impl WordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从分词结果构建
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counter = Self::new();
        for token in tokens {
            counter.increment(token);
        }
        counter
    }

    pub fn increment(&mut self, word: impl Into<String>) {
        self.add_count(word, 1);
    }

    pub fn add_count(&mut self, word: impl Into<String>, count: u64) {
        *self.counts.entry(word.into()).or_insert(0) += count;
    }

    /// 查询次数，不存在返回 0
    pub fn get(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    /// 所有词的总次数
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// 不同词的数量
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, u64> {
        self.counts.iter()
    }

    /// 合并另一个计数器
    pub fn merge(&mut self, other: &WordCounter) {
        for (word, count) in other.iter() {
            self.add_count(word.clone(), *count);
        }
    }

    /// 按次数降序（次数相同按词典序）
    pub fn most_common(&self, n: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> =
            self.counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(n);
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for WordCounter {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counter = Self::new();
        for (word, count) in iter {
            counter.add_count(word, count);
        }
        counter
    }
}

impl<'a> IntoIterator for &'a WordCounter {
    type Item = (&'a String, &'a u64);
    type IntoIter = hash_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}

impl AddAssign<&WordCounter> for WordCounter {
    fn add_assign(&mut self, other: &WordCounter) {
        self.merge(other);
    }
}

impl Add for WordCounter {
    type Output = WordCounter;

    fn add(mut self, other: WordCounter) -> WordCounter {
        self.merge(&other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_tokens() {
        let counter = WordCounter::from_tokens(["was", "convicted", "was"]);
        assert_eq!(counter.get("was"), 2);
        assert_eq!(counter.get("convicted"), 1);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(counter.total(), 3);
        assert_eq!(counter.len(), 2);
    }

    #[test]
    fn test_merge_sums_counts() {
        let mut a: WordCounter = [("he", 2u64), ("she", 1)].into_iter().collect();
        let b: WordCounter = [("she", 4u64), ("it", 1)].into_iter().collect();
        a += &b;
        assert_eq!(a.get("he"), 2);
        assert_eq!(a.get("she"), 5);
        assert_eq!(a.get("it"), 1);
        assert_eq!(a.total(), 8);
    }

    #[test]
    fn test_most_common_orders_by_count_then_word() {
        let counter = WordCounter::from_tokens(["b", "a", "b", "c", "a", "d"]);
        assert_eq!(counter.most_common(3), vec![("a", 2), ("b", 2), ("c", 1)]);
    }
}
