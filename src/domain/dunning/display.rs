//! Dunning 结果的文本表格

use std::fmt::Write;

use super::{DunningResult, WordScore};

const COLUMN_WIDTH: usize = 21;
const HEADINGS: [&str; 8] = [
    "term",
    "dunning",
    "count_total",
    "count_corp1",
    "count_corp2",
    "freq_total",
    "freq_corp1",
    "freq_corp2",
];

/// 为两侧各输出一张表，每张最多 `terms` 行
///
/// 语料 1 的表按分数降序，语料 2 的表按分数升序
pub fn format_dunning_table(
    result: &DunningResult,
    terms: usize,
    corpus1_name: &str,
    corpus2_name: &str,
) -> String {
    let mut output = String::new();
    let sections = [
        (corpus1_name, result.ranked_for_corpus1()),
        (corpus2_name, result.ranked_for_corpus2()),
    ];

    for (name, ranked) in sections {
        let _ = write!(output, "\nDunning Log-Likelihood results for {}\n|", name);
        for heading in HEADINGS {
            let heading = heading
                .replace("_corp1", &format!(" {}", corpus1_name))
                .replace("_corp2", &format!(" {}", corpus2_name));
            let _ = write!(output, " {:<19}|", heading);
        }
        output.push('\n');
        output.push_str(&"_".repeat(HEADINGS.len() * COLUMN_WIDTH));
        output.push('\n');

        for (word, score) in ranked.into_iter().take(terms) {
            output.push_str(&format_row(word, score));
        }
    }

    output
}

fn format_row(word: &str, score: &WordScore) -> String {
    format!(
        "|  {:<18}|  {:>17.2} |  {:>17} |  {:>17} |  {:>17} |  {:>16.4}% |  {:>16.4}% |  {:>16.4}% |\n",
        word,
        score.dunning,
        score.count_total,
        score.count_corp1,
        score.count_corp2,
        score.freq_total * 100.0,
        score.freq_corp1 * 100.0,
        score.freq_corp2 * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dunning::{dunning_total, DunningParams};
    use crate::domain::WordCounter;

    #[test]
    fn test_table_lists_both_sides() {
        let c1: WordCounter = [("she", 10u64), ("he", 1), ("and", 10)].into_iter().collect();
        let c2: WordCounter = [("she", 1u64), ("he", 10), ("and", 10)].into_iter().collect();
        let result = dunning_total(&c1, &c2, &DunningParams::default()).unwrap();

        let table = format_dunning_table(&result, 1, "Fem Author", "Male Author");
        assert!(table.contains("Dunning Log-Likelihood results for Fem Author"));
        assert!(table.contains("Dunning Log-Likelihood results for Male Author"));
        assert!(table.contains("count Fem Author"));
        assert!(table.contains("freq Male Author"));

        let rows: Vec<&str> = table.lines().filter(|l| l.starts_with("|  ")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("|  she "));
        assert!(rows[1].starts_with("|  he "));
        assert!(rows[0].contains("8.55"));
        assert!(rows[1].contains("-8.55"));
    }
}
