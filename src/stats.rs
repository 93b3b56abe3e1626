// WHY: Word counting must agree across scripts: English words are token
// matches, Chinese words are individual ideographs. Both feed one count.

use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::segmenter::is_cjk;

/// Read-only projection over a completed segmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// English word tokens plus individual CJK characters.
    pub word_count: usize,
    pub sentence_count: usize,
    /// Non-whitespace characters in the original text.
    pub char_count: usize,
    /// Rounded ratio, zero when there are no sentences.
    pub avg_words_per_sentence: usize,
}

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"\b[a-zA-Z]+\b").expect("word pattern compiles"))
}

/// Compute stats for a document and its segmented sentences. Pure function of
/// its inputs; empty text yields all zeros.
pub fn text_stats(text: &str, sentences: &[String]) -> TextStats {
    if text.is_empty() {
        return TextStats::default();
    }

    let english_words = word_pattern().find_iter(text).count();
    let cjk_chars = text.chars().filter(|&c| is_cjk(c)).count();
    let word_count = english_words + cjk_chars;

    let char_count = text.chars().filter(|c| !c.is_whitespace()).count();
    let sentence_count = sentences.len();

    let avg_words_per_sentence = if sentence_count > 0 {
        (word_count as f64 / sentence_count as f64).round() as usize
    } else {
        0
    };

    TextStats {
        word_count,
        sentence_count,
        char_count,
        avg_words_per_sentence,
    }
}

/// Human-readable one-line summary for stats display.
pub fn format_stats(stats: &TextStats) -> String {
    format!(
        "共 {} 句，{} 词，{} 字符 | 平均每句 {} 词",
        stats.sentence_count, stats.word_count, stats.char_count, stats.avg_words_per_sentence
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_stats_consistency() {
        let stats = text_stats("Hello world.", &sentences(&["Hello world."]));
        assert_eq!(stats.word_count, 2);
        assert_eq!(stats.sentence_count, 1);
        assert_eq!(stats.char_count, 11);
        assert_eq!(stats.avg_words_per_sentence, 2);
    }

    #[test]
    fn test_mixed_script_word_count() {
        // Two CJK characters plus one English word.
        let stats = text_stats("你好 world", &sentences(&["你好 world"]));
        assert_eq!(stats.word_count, 3);
        assert_eq!(stats.char_count, 7);
    }

    #[test]
    fn test_empty_text_yields_zeros() {
        let stats = text_stats("", &[]);
        assert_eq!(stats, TextStats::default());
    }

    #[test]
    fn test_avg_is_zero_without_sentences() {
        let stats = text_stats("word soup with no boundaries", &[]);
        assert_eq!(stats.sentence_count, 0);
        assert_eq!(stats.avg_words_per_sentence, 0);
    }

    #[test]
    fn test_avg_rounds_to_nearest() {
        // 5 words over 2 sentences rounds up to 3.
        let stats = text_stats(
            "One two three. Four five.",
            &sentences(&["One two three.", "Four five."]),
        );
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.avg_words_per_sentence, 3);
    }

    #[test]
    fn test_format_stats_template() {
        let stats = TextStats {
            word_count: 120,
            sentence_count: 10,
            char_count: 480,
            avg_words_per_sentence: 12,
        };
        assert_eq!(
            format_stats(&stats),
            "共 10 句，120 词，480 字符 | 平均每句 12 词"
        );
    }
}
