//! Corpus Context - Aggregate Root

use std::ops::Add;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::CorpusError;
use crate::application::ports::{FileLoaderError, FileLoaderPort};
use crate::domain::novel::{AuthorGender, MetadataField, Novel, NovelRecord};
use crate::domain::WordCounter;

/// Corpus 聚合根
///
/// 不变量: `novels` 始终按 (author, title, date) 排序，
/// 构造、过滤、合并之后都会重新排序
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    name: String,
    novels: Vec<Novel>,
}

impl Corpus {
    /// 空语料库
    pub fn empty() -> Self {
        Self::default()
    }

    /// 由给定小说构造
    pub fn from_novels(name: impl Into<String>, novels: Vec<Novel>) -> Self {
        let mut corpus = Self {
            name: name.into(),
            novels,
        };
        corpus.sort();
        corpus
    }

    /// 清单相对路径: `corpora/<name>/<name>.csv`
    pub fn manifest_path(name: &str) -> PathBuf {
        Path::new("corpora").join(name).join(format!("{}.csv", name))
    }

    /// 读取清单并构造语料库，正文保持未加载
    pub fn load(name: &str, loader: Arc<dyn FileLoaderPort>) -> Result<Self, CorpusError> {
        let path = Self::manifest_path(name);
        let lines = loader.load_lines(&path).map_err(|e| match e {
            FileLoaderError::NotFound(_) => CorpusError::ManifestNotFound(path.clone()),
            other => CorpusError::Loader(other),
        })?;

        let data = lines.join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(data.as_bytes());

        let mut novels = Vec::new();
        for (row, record) in reader.deserialize::<NovelRecord>().enumerate() {
            let mut record = record
                .map_err(|e| CorpusError::ManifestParse(format!("{}: {}", path.display(), e)))?;
            record.corpus_name = Some(name.to_string());
            let novel = Novel::from_record(record, Some(loader.clone())).map_err(|e| {
                tracing::error!(corpus = %name, row = row + 1, error = %e, "Invalid manifest row");
                e
            })?;
            novels.push(novel);
        }

        tracing::info!(
            corpus = %name,
            novels = novels.len(),
            loader = %loader.describe(),
            "Corpus loaded"
        );
        Ok(Self::from_novels(name, novels))
    }

    fn sort(&mut self) {
        self.novels.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn novels(&self) -> &[Novel] {
        &self.novels
    }

    pub fn len(&self) -> usize {
        self.novels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.novels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Novel> {
        self.novels.iter()
    }

    /// 保留满足谓词的小说，名称不变
    fn retain_matching<F>(&self, mut keep: F) -> Result<Corpus, CorpusError>
    where
        F: FnMut(&Novel) -> Result<bool, CorpusError>,
    {
        let mut novels = Vec::new();
        for novel in &self.novels {
            if keep(novel)? {
                novels.push(novel.clone());
            }
        }
        Ok(Self::from_novels(self.name.clone(), novels))
    }

    /// 按作者性别过滤
    pub fn filter_by_gender(&self, gender: &str) -> Result<Corpus, CorpusError> {
        let gender = parse_gender(gender)?;
        self.retain_matching(|novel| Ok(novel.metadata().author_gender == gender))
    }

    /// 按任意元数据字段过滤
    ///
    /// 缺少该字段的小说会导致 `MissingAttribute`
    pub fn subcorpus(&self, field: &str, value: &str) -> Result<Corpus, CorpusError> {
        let field = parse_field(field)?;
        if field == MetadataField::AuthorGender {
            return self.filter_by_gender(value);
        }
        self.retain_matching(|novel| Ok(required_value(novel, field)? == value))
    }

    /// 依次应用多个过滤条件（逻辑与）
    pub fn multi_filter(&self, filters: &[(&str, &str)]) -> Result<Corpus, CorpusError> {
        let mut corpus = self.clone();
        for (field, value) in filters {
            corpus = corpus.subcorpus(field, value)?;
        }
        Ok(corpus)
    }

    /// 返回第一本匹配的小说
    pub fn get_novel(&self, field: &str, value: &str) -> Result<&Novel, CorpusError> {
        self.get_novel_multiple_fields(&[(field, value)])
    }

    /// 返回第一本所有字段都匹配的小说
    pub fn get_novel_multiple_fields(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<&Novel, CorpusError> {
        let parsed = fields
            .iter()
            .map(|(field, value)| Ok((parse_field(field)?, *value)))
            .collect::<Result<Vec<_>, CorpusError>>()?;

        for novel in &self.novels {
            let mut matched = true;
            for (field, value) in &parsed {
                if novel.field_value(*field).as_deref() != Some(*value) {
                    matched = false;
                    break;
                }
            }
            if matched {
                return Ok(novel);
            }
        }

        let query = fields
            .iter()
            .map(|(f, v)| format!("{}={}", f, v))
            .collect::<Vec<_>>()
            .join(", ");
        Err(CorpusError::NovelNotFound(format!("{} ({})", query, self.name)))
    }

    /// 指定性别的作者数量
    pub fn count_authors_by_gender(&self, gender: &str) -> Result<usize, CorpusError> {
        let gender = parse_gender(gender)?;
        Ok(self
            .novels
            .iter()
            .filter(|novel| novel.metadata().author_gender == gender)
            .count())
    }

    /// 全部小说词频之和，会加载所有正文
    pub fn get_wordcount_counter(&self) -> Result<WordCounter, CorpusError> {
        let mut counter = WordCounter::new();
        for novel in &self.novels {
            counter += novel.get_wordcount_counter()?;
        }
        tracing::debug!(
            corpus = %self.name,
            novels = self.novels.len(),
            distinct_words = counter.len(),
            "Corpus word counter built"
        );
        Ok(counter)
    }

    /// 成员身份指纹
    ///
    /// 只依赖排序后的小说元数据，与语料库名称和正文是否已加载无关
    pub fn fingerprint(&self) -> String {
        let mut ctx = md5::Context::new();
        for novel in &self.novels {
            let m = novel.metadata();
            let date = m.date.to_string();
            for part in [
                m.author.as_str(),
                m.title.as_str(),
                date.as_str(),
                m.corpus_name.as_str(),
                m.filename.as_str(),
            ] {
                ctx.consume(part.as_bytes());
                ctx.consume([0u8]);
            }
            ctx.consume(b"\n");
        }
        format!("{:x}", ctx.compute())
    }
}

fn parse_gender(gender: &str) -> Result<AuthorGender, CorpusError> {
    AuthorGender::from_str(gender).map_err(|_| CorpusError::UnsupportedGender {
        value: gender.to_string(),
        supported: AuthorGender::supported_values(),
    })
}

fn parse_field(field: &str) -> Result<MetadataField, CorpusError> {
    MetadataField::parse(field).ok_or_else(|| CorpusError::UnsupportedField(field.to_string()))
}

fn required_value(novel: &Novel, field: MetadataField) -> Result<String, CorpusError> {
    novel
        .field_value(field)
        .ok_or_else(|| CorpusError::MissingAttribute {
            novel: format!("{} by {}", novel.title(), novel.author()),
            field: field.to_string(),
        })
}

impl PartialEq for Corpus {
    /// 排序后逐本比较，忽略名称
    fn eq(&self, other: &Self) -> bool {
        self.novels.len() == other.novels.len()
            && self.novels.iter().zip(&other.novels).all(|(a, b)| a == b)
    }
}

impl Add for Corpus {
    type Output = Corpus;

    /// 多重集合并，不去重
    fn add(self, other: Corpus) -> Corpus {
        let name = format!("{} and {}", self.name, other.name);
        let mut novels = self.novels;
        novels.extend(other.novels);
        Corpus::from_novels(name, novels)
    }
}

impl Add<&Corpus> for &Corpus {
    type Output = Corpus;

    fn add(self, other: &Corpus) -> Corpus {
        self.clone() + other.clone()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Novel;
    type IntoIter = std::slice::Iter<'a, Novel>;

    fn into_iter(self) -> Self::IntoIter {
        self.novels.iter()
    }
}
