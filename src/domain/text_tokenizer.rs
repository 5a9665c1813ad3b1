//! 文本预处理
//!
//! - 出版方样板（Project Gutenberg 头尾声明）剥离
//! - 简单分词：去 ASCII 标点、转小写、按空白切分

/// 正文起始标记（出现在样板头部的最后一行）
pub const BOILERPLATE_START_MARKERS: &[&str] = &[
    "*** START OF THIS PROJECT GUTENBERG EBOOK",
    "*** START OF THE PROJECT GUTENBERG EBOOK",
    "*** START OF PROJECT GUTENBERG",
];

/// 正文结束标记（出现在样板尾部的第一行）
pub const BOILERPLATE_END_MARKERS: &[&str] = &[
    "*** END OF THIS PROJECT GUTENBERG EBOOK",
    "*** END OF THE PROJECT GUTENBERG EBOOK",
    "*** END OF PROJECT GUTENBERG",
    "End of the Project Gutenberg EBook",
    "End of Project Gutenberg",
];

/// 检查是否为需要移除的字符
///
/// 与 `!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~` 集合一致，非 ASCII 标点保留
#[inline]
fn is_excluded_char(ch: char) -> bool {
    ch.is_ascii_punctuation()
}

/// 所在行的行尾（含换行符）之后的位置
fn end_of_line(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|offset| pos + offset + 1)
        .unwrap_or(text.len())
}

/// 所在行的行首位置
fn start_of_line(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// 剥离出版方样板
///
/// 启发式策略：
/// 1. 在第一个结束标记之前找最后一个起始标记，正文从该标记所在行的下一行开始
///    （扉页上重复出现的起始标记因此一并去掉）
/// 2. 在正文范围内找到任一结束标记，正文截止到该标记所在行之前
/// 3. 找不到标记时对应一端保持不变
pub fn strip_boilerplate(text: &str) -> &str {
    let first_end = BOILERPLATE_END_MARKERS
        .iter()
        .filter_map(|marker| text.find(marker))
        .min()
        .unwrap_or(text.len());
    let head = &text[..first_end];

    let start = BOILERPLATE_START_MARKERS
        .iter()
        .filter_map(|marker| head.rfind(marker))
        .map(|pos| end_of_line(text, pos))
        .max()
        .unwrap_or(0);

    let body = &text[start..];
    let end = BOILERPLATE_END_MARKERS
        .iter()
        .filter_map(|marker| body.find(marker))
        .min()
        .map(|pos| start_of_line(body, pos))
        .unwrap_or(body.len());

    &body[..end]
}

/// 检查文本中是否残留样板标记
pub fn contains_boilerplate_marker(text: &str) -> bool {
    BOILERPLATE_START_MARKERS
        .iter()
        .chain(BOILERPLATE_END_MARKERS.iter())
        .any(|marker| text.contains(marker))
}

/// 分词
///
/// 移除所有 ASCII 标点后转小写并按空白切分。
/// 不处理连字符与缩写，`all-kinds` 会合并为 `allkinds`。
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text.chars().filter(|c| !is_excluded_char(*c)).collect();
    cleaned
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUTENBERG_SAMPLE: &str = "The Project Gutenberg EBook of Persuasion, by Jane Austen\n\
        This eBook is for the use of anyone anywhere at no cost.\n\
        *** START OF THIS PROJECT GUTENBERG EBOOK PERSUASION ***\n\
        Sir Walter Elliot, of Kellynch Hall, in Somersetshire.\n\
        Finis\n\
        *** END OF THIS PROJECT GUTENBERG EBOOK PERSUASION ***\n\
        Updated editions will replace the previous one.\n";

    #[test]
    fn test_tokenize_strips_punctuation_and_lowercases() {
        let tokens = tokenize("?!All-kinds %$< of pun*ct(uatio)n {a}nd sp+ecial cha/rs");
        assert_eq!(
            tokens,
            vec!["allkinds", "of", "punctuation", "and", "special", "chars"]
        );
    }

    #[test]
    fn test_tokenize_keeps_non_ascii_punctuation() {
        let tokens = tokenize("“Quoted” words");
        assert_eq!(tokens, vec!["“quoted”", "words"]);
    }

    #[test]
    fn test_tokenize_is_pure() {
        let text = "Hester was convicted. Hester!";
        assert_eq!(tokenize(text), tokenize(text));
    }

    #[test]
    fn test_strip_boilerplate_removes_header_and_footer() {
        let body = strip_boilerplate(GUTENBERG_SAMPLE);
        assert_eq!(
            body,
            "Sir Walter Elliot, of Kellynch Hall, in Somersetshire.\nFinis\n"
        );
        assert!(!contains_boilerplate_marker(body));
    }

    #[test]
    fn test_strip_boilerplate_with_repeated_start_marker() {
        let text = "*** START OF THIS PROJECT GUTENBERG EBOOK A ***\n\
            Title page\n\
            *** START OF THIS PROJECT GUTENBERG EBOOK A ***\n\
            body\n\
            *** END OF THIS PROJECT GUTENBERG EBOOK A ***\n";
        let body = strip_boilerplate(text);
        assert_eq!(body, "body\n");
        assert!(!contains_boilerplate_marker(body));
    }

    #[test]
    fn test_strip_boilerplate_ignores_start_marker_after_end() {
        let text = "*** START OF THIS PROJECT GUTENBERG EBOOK A ***\n\
            body\n\
            *** END OF THIS PROJECT GUTENBERG EBOOK A ***\n\
            *** START OF THIS PROJECT GUTENBERG EBOOK B ***\n";
        assert_eq!(strip_boilerplate(text), "body\n");
    }

    #[test]
    fn test_strip_boilerplate_without_markers_keeps_text() {
        let text = "Plain text without any publisher notes.";
        assert_eq!(strip_boilerplate(text), text);
    }

    #[test]
    fn test_strip_boilerplate_with_only_start_marker() {
        let text = "header\n*** START OF THE PROJECT GUTENBERG EBOOK X ***\nbody line\n";
        assert_eq!(strip_boilerplate(text), "body line\n");
    }

    #[test]
    fn test_strip_boilerplate_with_only_end_marker() {
        let text = "body line\nEnd of the Project Gutenberg EBook of X\nlicense";
        assert_eq!(strip_boilerplate(text), "body line\n");
    }
}
