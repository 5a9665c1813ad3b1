//! Novel Context - Value Objects

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::NovelError;

/// 作者性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorGender {
    Female,
    Male,
    NonBinary,
    #[default]
    Unknown,
    Both,
}

impl AuthorGender {
    pub const ALL: [AuthorGender; 5] = [
        AuthorGender::Female,
        AuthorGender::Male,
        AuthorGender::NonBinary,
        AuthorGender::Unknown,
        AuthorGender::Both,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorGender::Female => "female",
            AuthorGender::Male => "male",
            AuthorGender::NonBinary => "non-binary",
            AuthorGender::Unknown => "unknown",
            AuthorGender::Both => "both",
        }
    }

    /// 逗号分隔的全部取值（错误提示用）
    pub fn supported_values() -> String {
        Self::ALL
            .iter()
            .map(AuthorGender::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for AuthorGender {
    type Err = NovelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| NovelError::InvalidAuthorGender(s.to_string()))
    }
}

impl std::fmt::Display for AuthorGender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 元数据字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Author,
    AuthorGender,
    CorpusName,
    CountryPublication,
    Date,
    Filename,
    GutenbergId,
    Notes,
    Subject,
    Title,
}

impl MetadataField {
    pub const ALL: [MetadataField; 10] = [
        MetadataField::Author,
        MetadataField::AuthorGender,
        MetadataField::CorpusName,
        MetadataField::CountryPublication,
        MetadataField::Date,
        MetadataField::Filename,
        MetadataField::GutenbergId,
        MetadataField::Notes,
        MetadataField::Subject,
        MetadataField::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Author => "author",
            MetadataField::AuthorGender => "author_gender",
            MetadataField::CorpusName => "corpus_name",
            MetadataField::CountryPublication => "country_publication",
            MetadataField::Date => "date",
            MetadataField::Filename => "filename",
            MetadataField::GutenbergId => "gutenberg_id",
            MetadataField::Notes => "notes",
            MetadataField::Subject => "subject",
            MetadataField::Title => "title",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 清单中的一行（未校验）
///
/// CSV 表头必须是已知列名，未知列在反序列化时即被拒绝。
/// `text` 列不会出现在清单里，用于直接提供正文。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NovelRecord {
    pub author: Option<String>,
    pub date: Option<String>,
    pub title: Option<String>,
    pub corpus_name: Option<String>,
    pub filename: Option<String>,
    pub country_publication: Option<String>,
    pub author_gender: Option<String>,
    pub notes: Option<String>,
    pub gutenberg_id: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
}

impl NovelRecord {
    /// 必填字段齐全的记录
    pub fn new(
        author: impl Into<String>,
        date: impl Into<String>,
        title: impl Into<String>,
        corpus_name: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            author: Some(author.into()),
            date: Some(date.into()),
            title: Some(title.into()),
            corpus_name: Some(corpus_name.into()),
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    pub fn with_author_gender(mut self, gender: impl Into<String>) -> Self {
        self.author_gender = Some(gender.into());
        self
    }

    pub fn with_country_publication(mut self, country: impl Into<String>) -> Self {
        self.country_publication = Some(country.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// 已校验的小说元数据
///
/// 不变量:
/// - author/title/corpus_name 非空，author 以大写字母开头（"Last, First"）
/// - date 为四位数年份
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NovelMetadata {
    pub author: String,
    pub date: u16,
    pub title: String,
    pub corpus_name: String,
    pub filename: String,
    pub country_publication: Option<String>,
    pub author_gender: AuthorGender,
    pub notes: Option<String>,
    pub gutenberg_id: Option<String>,
    pub subject: Option<String>,
}

/// 去掉空白，空字符串视为缺失
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(
    value: &Option<String>,
    field: &'static str,
    record: &NovelRecord,
) -> Result<String, NovelError> {
    non_empty(value).ok_or_else(|| NovelError::MissingField {
        field,
        context: describe_record(record),
    })
}

fn describe_record(record: &NovelRecord) -> String {
    format!(
        "author={:?}, title={:?}, filename={:?}",
        record.author.as_deref().unwrap_or_default(),
        record.title.as_deref().unwrap_or_default(),
        record.filename.as_deref().unwrap_or_default()
    )
}

/// 校验年份：恰好四位 ASCII 数字
pub fn parse_year(date: &str) -> Result<u16, NovelError> {
    if date.len() != 4 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NovelError::InvalidDate(date.to_string()));
    }
    date.parse::<u16>()
        .map_err(|_| NovelError::InvalidDate(date.to_string()))
}

impl TryFrom<&NovelRecord> for NovelMetadata {
    type Error = NovelError;

    fn try_from(record: &NovelRecord) -> Result<Self, Self::Error> {
        let author = required(&record.author, "author", record)?;
        let date = required(&record.date, "date", record)?;
        let title = required(&record.title, "title", record)?;
        let corpus_name = required(&record.corpus_name, "corpus_name", record)?;

        // 有直接提供的正文时允许没有文件名
        let filename = match (non_empty(&record.filename), &record.text) {
            (Some(filename), _) => filename,
            (None, Some(_)) => String::new(),
            (None, None) => {
                return Err(NovelError::MissingField {
                    field: "filename",
                    context: describe_record(record),
                })
            }
        };

        if !author.chars().next().map_or(false, char::is_uppercase) {
            return Err(NovelError::InvalidAuthor(author));
        }

        let date = parse_year(&date)?;

        let author_gender = match non_empty(&record.author_gender) {
            Some(gender) => gender.parse::<AuthorGender>()?,
            None => AuthorGender::Unknown,
        };

        Ok(Self {
            author,
            date,
            title,
            corpus_name,
            filename,
            country_publication: non_empty(&record.country_publication),
            author_gender,
            notes: non_empty(&record.notes),
            gutenberg_id: non_empty(&record.gutenberg_id),
            subject: non_empty(&record.subject),
        })
    }
}

impl NovelMetadata {
    /// 字段的字符串值，可选字段缺失时为 None
    pub fn field_value(&self, field: MetadataField) -> Option<String> {
        match field {
            MetadataField::Author => Some(self.author.clone()),
            MetadataField::AuthorGender => Some(self.author_gender.as_str().to_string()),
            MetadataField::CorpusName => Some(self.corpus_name.clone()),
            MetadataField::CountryPublication => self.country_publication.clone(),
            MetadataField::Date => Some(self.date.to_string()),
            MetadataField::Filename => {
                Some(self.filename.clone()).filter(|f| !f.is_empty())
            }
            MetadataField::GutenbergId => self.gutenberg_id.clone(),
            MetadataField::Notes => self.notes.clone(),
            MetadataField::Subject => self.subject.clone(),
            MetadataField::Title => Some(self.title.clone()),
        }
    }
}
