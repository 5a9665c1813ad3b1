//! Novel Context - Aggregate Root

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::{MetadataField, NovelError, NovelMetadata, NovelRecord};
use crate::application::ports::{FileLoaderError, FileLoaderPort};
use crate::domain::text_tokenizer::{strip_boilerplate, tokenize};
use crate::domain::WordCounter;

/// Novel 聚合根
///
/// 不变量:
/// - 元数据在构造时校验完毕，之后不可变
/// - 正文首次访问时通过注入的 FileLoader 加载并剥离样板，之后保持不变
/// - 词数与词频计数器由正文惰性派生；`set_text` 替换正文时一并失效
#[derive(Clone)]
pub struct Novel {
    metadata: NovelMetadata,
    loader: Option<Arc<dyn FileLoaderPort>>,
    text: OnceLock<String>,
    word_count: OnceLock<usize>,
    word_counter: OnceLock<WordCounter>,
}

impl Novel {
    /// 创建小说，正文在首次访问时加载
    pub fn new(metadata: NovelMetadata, loader: Arc<dyn FileLoaderPort>) -> Result<Self, NovelError> {
        if !metadata.filename.ends_with(".txt") {
            return Err(NovelError::InvalidFilename(metadata.filename));
        }
        Ok(Self {
            metadata,
            loader: Some(loader),
            text: OnceLock::new(),
            word_count: OnceLock::new(),
            word_counter: OnceLock::new(),
        })
    }

    /// 使用直接提供的正文创建小说（不剥离样板）
    pub fn with_text(metadata: NovelMetadata, text: impl Into<String>) -> Self {
        Self {
            metadata,
            loader: None,
            text: OnceLock::from(text.into()),
            word_count: OnceLock::new(),
            word_counter: OnceLock::new(),
        }
    }

    /// 从清单记录创建
    ///
    /// 记录带 `text` 时直接使用，否则需要 loader
    pub fn from_record(
        record: NovelRecord,
        loader: Option<Arc<dyn FileLoaderPort>>,
    ) -> Result<Self, NovelError> {
        let metadata = NovelMetadata::try_from(&record)?;
        match (record.text, loader) {
            (Some(text), _) => Ok(Self::with_text(metadata, text)),
            (None, Some(loader)) => Self::new(metadata, loader),
            (None, None) => Err(NovelError::LoadError(format!(
                "{} 既没有正文也没有文件加载器",
                metadata.title
            ))),
        }
    }

    /// 替换正文，所有派生统计随之失效
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = OnceLock::from(text.into());
        self.word_count = OnceLock::new();
        self.word_counter = OnceLock::new();
    }

    // Getters
    pub fn metadata(&self) -> &NovelMetadata {
        &self.metadata
    }

    pub fn author(&self) -> &str {
        &self.metadata.author
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn date(&self) -> u16 {
        self.metadata.date
    }

    pub fn corpus_name(&self) -> &str {
        &self.metadata.corpus_name
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }

    pub fn field_value(&self, field: MetadataField) -> Option<String> {
        self.metadata.field_value(field)
    }

    /// 排序键: (author, title, date)
    pub fn sort_key(&self) -> (&str, &str, u16) {
        (&self.metadata.author, &self.metadata.title, self.metadata.date)
    }

    /// 正文相对路径: `corpora/<corpus>/texts/<filename>`
    pub fn text_path(&self) -> PathBuf {
        Path::new("corpora")
            .join(&self.metadata.corpus_name)
            .join("texts")
            .join(&self.metadata.filename)
    }

    /// 是否已加载正文
    pub fn is_text_loaded(&self) -> bool {
        self.text.get().is_some()
    }

    /// 正文（已剥离样板）
    pub fn text(&self) -> Result<&str, NovelError> {
        if let Some(text) = self.text.get() {
            return Ok(text.as_str());
        }
        let loaded = self.load_novel_text()?;
        Ok(self.text.get_or_init(|| loaded).as_str())
    }

    fn load_novel_text(&self) -> Result<String, NovelError> {
        let loader = self.loader.as_ref().ok_or_else(|| {
            NovelError::LoadError(format!("{} 没有可用的文件加载器", self.metadata.title))
        })?;

        let path = self.text_path();
        let raw = loader.load_text(&path).map_err(|e| match e {
            FileLoaderError::NotFound(_) => NovelError::TextNotFound(path.clone()),
            other => NovelError::LoadError(other.to_string()),
        })?;

        let text = strip_boilerplate(&raw);
        tracing::debug!(
            path = %path.display(),
            raw_len = raw.len(),
            text_len = text.len(),
            "Novel text loaded"
        );
        Ok(text.to_string())
    }

    /// 分词后的正文
    pub fn get_tokenized_text(&self) -> Result<Vec<String>, NovelError> {
        Ok(tokenize(self.text()?))
    }

    /// 总词数（惰性计算）
    pub fn word_count(&self) -> Result<usize, NovelError> {
        if let Some(count) = self.word_count.get() {
            return Ok(*count);
        }
        let count = match self.word_counter.get() {
            Some(counter) => counter.total() as usize,
            None => self.get_tokenized_text()?.len(),
        };
        Ok(*self.word_count.get_or_init(|| count))
    }

    /// 词频计数器（惰性构建，之后复用）
    pub fn get_wordcount_counter(&self) -> Result<&WordCounter, NovelError> {
        if let Some(counter) = self.word_counter.get() {
            return Ok(counter);
        }
        let counter = WordCounter::from_tokens(self.get_tokenized_text()?);
        Ok(self.word_counter.get_or_init(|| counter))
    }

    /// 单词出现次数，不区分大小写
    pub fn get_count_of_word(&self, word: &str) -> Result<u64, NovelError> {
        Ok(self.get_wordcount_counter()?.get(&word.to_lowercase()))
    }

    /// 单词出现次数 / 总词数
    pub fn get_word_freq(&self, word: &str) -> Result<f64, NovelError> {
        let total = self.word_count()?;
        if total == 0 {
            return Err(NovelError::ZeroWordCount(self.to_string()));
        }
        Ok(self.get_count_of_word(word)? as f64 / total as f64)
    }

    /// 统计紧跟在 `word` 之后的词
    ///
    /// 重复出现时（"his his cigarette"）第二个 `his` 也会被计入
    pub fn words_associated(&self, word: &str) -> Result<WordCounter, NovelError> {
        let word = word.to_lowercase();
        let tokens = self.get_tokenized_text()?;
        let mut counter = WordCounter::new();
        for pair in tokens.windows(2) {
            if pair[0] == word {
                counter.increment(pair[1].as_str());
            }
        }
        Ok(counter)
    }

    /// 统计检索词周围窗口内的词
    ///
    /// 窗口大小 `2 * window_size + 1`，以检索词为中心；只考虑完整窗口，
    /// 太靠近文本两端的出现会被跳过。检索词本身不计入。
    pub fn get_word_windows<S: AsRef<str>>(
        &self,
        terms: &[S],
        window_size: usize,
    ) -> Result<WordCounter, NovelError> {
        let terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();
        let is_term = |token: &str| terms.iter().any(|t| t == token);

        let tokens = self.get_tokenized_text()?;
        let mut counter = WordCounter::new();
        let width = match window_size.checked_mul(2).and_then(|w| w.checked_add(1)) {
            Some(width) if width <= tokens.len() => width,
            _ => return Ok(counter),
        };
        for window in tokens.windows(width) {
            if !is_term(&window[window_size]) {
                continue;
            }
            for token in window {
                if !is_term(token) {
                    counter.increment(token.as_str());
                }
            }
        }
        Ok(counter)
    }

    /// 相邻两次出现之间隔了多少个词
    pub fn instance_distances(&self, word: &str) -> Result<Vec<usize>, NovelError> {
        let word = word.to_lowercase();
        let tokens = self.get_tokenized_text()?;
        let mut distances = Vec::new();
        let mut last: Option<usize> = None;
        for (i, token) in tokens.iter().enumerate() {
            if *token == word {
                if let Some(prev) = last {
                    distances.push(i - prev);
                }
                last = Some(i);
            }
        }
        Ok(distances)
    }

    /// 找出正文中所有引号内的语句
    ///
    /// 以 `"` 开头的词开启引述，以 `"` 结尾的词结束；
    /// 以 `,"` 结尾表示引述被旁白打断，直到下一个 `"` 开头的词继续。
    pub fn find_quoted_text(&self) -> Result<Vec<String>, NovelError> {
        let mut quotes = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut in_progress = false;
        let mut paused = false;

        for word in self.text()?.split_whitespace() {
            if word.starts_with('"') {
                in_progress = true;
                paused = false;
                current.push(word);
                if word.len() == 1 || !word.ends_with('"') {
                    continue;
                }
            } else if in_progress {
                if !paused {
                    current.push(word);
                }
            } else {
                continue;
            }

            if word.ends_with('"') {
                if word.ends_with(",\"") {
                    paused = true;
                } else {
                    in_progress = false;
                    paused = false;
                    quotes.push(current.join(" "));
                    current.clear();
                }
            }
        }

        Ok(quotes)
    }
}

impl PartialEq for Novel {
    /// 元数据与正文全部一致才相等；任一正文加载失败视为不等
    fn eq(&self, other: &Self) -> bool {
        if self.metadata != other.metadata {
            return false;
        }
        match (self.text(), other.text()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Novel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Novel")
            .field("metadata", &self.metadata)
            .field("text_loaded", &self.is_text_loaded())
            .field("loader", &self.loader.as_ref().map(|l| l.describe()))
            .finish()
    }
}

impl std::fmt::Display for Novel {
    /// 文件名去掉 `.txt`，没有文件名时用标题
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filename = &self.metadata.filename;
        if filename.is_empty() {
            return f.write_str(&self.metadata.title);
        }
        f.write_str(filename.strip_suffix(".txt").unwrap_or(filename))
    }
}
