//! Frequency Query Handlers

use serde::Serialize;
use std::collections::BTreeMap;

use crate::application::error::ApplicationError;
use crate::application::queries::{GetInstanceDistances, GetPronounFrequencies};
use crate::domain::corpus::Corpus;
use crate::domain::novel::{AuthorGender, Novel};

const MALE_PRONOUNS: [&str; 3] = ["he", "him", "his"];
const FEMALE_PRONOUNS: [&str; 3] = ["she", "her", "hers"];

/// 把若干频率归一化为和为 1 的比例
///
/// 总和为 0 时全部返回 0
pub fn get_comparative_word_freq<K>(frequencies: &BTreeMap<K, f64>) -> BTreeMap<K, f64>
where
    K: Ord + Clone,
{
    let total: f64 = frequencies.values().sum();
    frequencies
        .iter()
        .map(|(k, v)| {
            let share = if total == 0.0 { 0.0 } else { v / total };
            (k.clone(), share)
        })
        .collect()
}

/// 两个值的占比 (a / (a + b), b / (a + b))
fn shares(a: f64, b: f64) -> (f64, f64) {
    let freqs = BTreeMap::from([(0u8, a), (1u8, b)]);
    let shares = get_comparative_word_freq(&freqs);
    (shares[&0], shares[&1])
}

// ============================================================================
// Response DTOs
// ============================================================================

/// 单本小说的代词统计
#[derive(Debug, Clone, Serialize)]
pub struct NovelPronounFrequency {
    pub novel: String,
    pub author: String,
    pub author_gender: AuthorGender,
    pub date: u16,
    /// 女性代词 (she/her/hers) 占全部性别代词的比例
    pub female_relative_freq: f64,
    /// he 占 he + him 的比例
    pub male_subject_proportion: f64,
    /// she 占 she + her 的比例
    pub female_subject_proportion: f64,
    /// she 占 he + she 的比例
    pub female_subject_share: f64,
}

/// 代词频率报告
#[derive(Debug, Clone, Serialize)]
pub struct PronounFrequencyReport {
    pub corpus: String,
    pub novels: Vec<NovelPronounFrequency>,
    /// 按作者性别分组的 `female_relative_freq` 平均值
    pub mean_female_freq_by_author_gender: BTreeMap<String, f64>,
}

/// 单本小说的出现间隔
#[derive(Debug, Clone, Serialize)]
pub struct NovelInstanceDistances {
    pub novel: String,
    pub author_gender: AuthorGender,
    pub distances: Vec<usize>,
    pub median: Option<f64>,
}

/// 出现间隔报告
#[derive(Debug, Clone, Serialize)]
pub struct InstanceDistanceReport {
    pub corpus: String,
    pub word: String,
    pub novels: Vec<NovelInstanceDistances>,
}

fn median(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

// ============================================================================
// Handler
// ============================================================================

/// 词频类查询处理器
#[derive(Debug, Clone, Default)]
pub struct FrequencyQueryHandler;

impl FrequencyQueryHandler {
    pub fn new() -> Self {
        Self
    }

    fn pronoun_frequency(novel: &Novel) -> Result<NovelPronounFrequency, ApplicationError> {
        let freq = |word: &str| novel.get_word_freq(word);

        let mut male = 0.0;
        for word in MALE_PRONOUNS {
            male += freq(word)?;
        }
        let mut female = 0.0;
        for word in FEMALE_PRONOUNS {
            female += freq(word)?;
        }

        let (he, him, she, her) = (freq("he")?, freq("him")?, freq("she")?, freq("her")?);
        let (_, female_relative_freq) = shares(male, female);
        let (male_subject_proportion, _) = shares(he, him);
        let (female_subject_proportion, _) = shares(she, her);
        let (_, female_subject_share) = shares(he, she);

        Ok(NovelPronounFrequency {
            novel: novel.to_string(),
            author: novel.author().to_string(),
            author_gender: novel.metadata().author_gender,
            date: novel.date(),
            female_relative_freq,
            male_subject_proportion,
            female_subject_proportion,
            female_subject_share,
        })
    }

    /// 每本小说的代词频率，以及按作者性别的平均值
    pub fn pronoun_frequencies(
        &self,
        corpus: &Corpus,
        _query: GetPronounFrequencies,
    ) -> Result<PronounFrequencyReport, ApplicationError> {
        let novels = corpus
            .iter()
            .map(Self::pronoun_frequency)
            .collect::<Result<Vec<_>, _>>()?;

        let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for row in &novels {
            grouped
                .entry(row.author_gender.as_str().to_string())
                .or_default()
                .push(row.female_relative_freq);
        }
        let mean_female_freq_by_author_gender = grouped
            .into_iter()
            .map(|(gender, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                (gender, mean)
            })
            .collect();

        tracing::info!(
            corpus = %corpus.name(),
            novels = novels.len(),
            "Pronoun frequencies computed"
        );

        Ok(PronounFrequencyReport {
            corpus: corpus.name().to_string(),
            novels,
            mean_female_freq_by_author_gender,
        })
    }

    /// 每本小说中检索词的出现间隔
    pub fn instance_distances(
        &self,
        corpus: &Corpus,
        query: GetInstanceDistances,
    ) -> Result<InstanceDistanceReport, ApplicationError> {
        let word = query.word.to_lowercase();
        if word.is_empty() {
            return Err(ApplicationError::validation("instance distance word cannot be empty"));
        }

        let mut novels = Vec::with_capacity(corpus.len());
        for novel in corpus {
            let distances = novel.instance_distances(&word)?;
            novels.push(NovelInstanceDistances {
                novel: novel.to_string(),
                author_gender: novel.metadata().author_gender,
                median: median(&distances),
                distances,
            });
        }

        tracing::info!(
            corpus = %corpus.name(),
            word = %word,
            novels = novels.len(),
            "Instance distances computed"
        );

        Ok(InstanceDistanceReport {
            corpus: corpus.name().to_string(),
            word,
            novels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::NovelRecord;

    fn novel(author: &str, gender: &str, text: &str) -> Novel {
        let record = NovelRecord::new(author, "1850", "Title", "test_corpus", "")
            .with_author_gender(gender)
            .with_text(text);
        Novel::from_record(record, None).unwrap()
    }

    #[test]
    fn test_comparative_word_freq_sums_to_one() {
        let freqs = BTreeMap::from([("he", 0.3), ("she", 0.1)]);
        let shares = get_comparative_word_freq(&freqs);
        assert!((shares["he"] + shares["she"] - 1.0).abs() < 1e-12);
        assert!((shares["he"] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_comparative_word_freq_zero_total() {
        let freqs = BTreeMap::from([("he", 0.0), ("she", 0.0)]);
        let shares = get_comparative_word_freq(&freqs);
        assert_eq!(shares["he"], 0.0);
        assert_eq!(shares["she"], 0.0);
    }

    #[test]
    fn test_pronoun_frequencies() {
        let corpus = Corpus::from_novels(
            "test_corpus",
            vec![
                novel("Austen, Jane", "female", "she saw her and she left him"),
                novel("Dickens, Charles", "male", "he saw him and he left"),
            ],
        );
        let report = FrequencyQueryHandler::new()
            .pronoun_frequencies(&corpus, GetPronounFrequencies)
            .unwrap();

        assert_eq!(report.novels.len(), 2);
        let austen = &report.novels[0];
        assert!((austen.female_relative_freq - 0.75).abs() < 1e-12);
        assert!((austen.female_subject_proportion - 2.0 / 3.0).abs() < 1e-12);
        assert!((austen.female_subject_share - 1.0).abs() < 1e-12);
        assert_eq!(austen.male_subject_proportion, 0.0);

        let dickens = &report.novels[1];
        assert_eq!(dickens.female_relative_freq, 0.0);
        assert!((dickens.male_subject_proportion - 2.0 / 3.0).abs() < 1e-12);

        assert!((report.mean_female_freq_by_author_gender["female"] - 0.75).abs() < 1e-12);
        assert_eq!(report.mean_female_freq_by_author_gender["male"], 0.0);
    }

    #[test]
    fn test_instance_distances() {
        let corpus = Corpus::from_novels(
            "test_corpus",
            vec![novel("Austen, Jane", "female", "her a her b c her d")],
        );
        let report = FrequencyQueryHandler::new()
            .instance_distances(
                &corpus,
                GetInstanceDistances {
                    word: "Her".to_string(),
                },
            )
            .unwrap();
        assert_eq!(report.word, "her");
        assert_eq!(report.novels[0].distances, vec![2, 3]);
        assert_eq!(report.novels[0].median, Some(2.5));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[5, 1, 3]), Some(3.0));
    }
}
