// WHY: Mixed Chinese/English text lacks a single reliable boundary signal, so
// detection is a code-point scan with trailing-token exemptions (abbreviations,
// initials, list markers) and a look-ahead confirmation on the next character.

use anyhow::Result;
use regex_automata::{meta::Regex, Anchored, Input};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod abbreviations;
mod merge;
mod numbered;

pub use abbreviations::AbbreviationChecker;

/// Punctuation that can terminate a sentence in either script.
pub const SENTENCE_ENDERS: &[char] = &['.', '!', '?', '。', '！', '？'];

/// Result of segmenting one document. Immutable once returned; sentence
/// indices stay valid for the lifetime of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Trimmed, non-empty sentences in reading order.
    pub sentences: Vec<String>,
    /// Sorted, deduplicated sentence indices after which a paragraph gap
    /// occurs. Every value is strictly less than `sentences.len() - 1`.
    pub paragraph_breaks: Vec<usize>,
}

/// Configuration for sentence segmentation behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmenterOptions {
    /// Reject sentences shorter than 3 chars or containing no word content
    /// (punctuation-only, digits-and-symbols-only). Off by default.
    pub filter_degenerate_sentences: bool,
}

/// Intermediate sentence tagged with a stable id so paragraph breaks survive
/// the merge pass.
#[derive(Debug, Clone)]
struct Provisional {
    id: usize,
    text: String,
}

/// Sentence and paragraph segmenter for mixed Chinese/English text.
pub struct Segmenter {
    options: SegmenterOptions,
    abbreviations: AbbreviationChecker,
    /// Matches a leading digit sequence plus period; used anchored at line
    /// starts for numbered-list detection.
    numbered_line: Regex,
}

impl Segmenter {
    pub fn new(options: SegmenterOptions) -> Result<Self> {
        let numbered_line = Regex::new(r"[0-9]+\.")?;
        Ok(Self {
            options,
            abbreviations: AbbreviationChecker::new(),
            numbered_line,
        })
    }

    pub fn with_default_options() -> Result<Self> {
        Self::new(SegmenterOptions::default())
    }

    /// Split text into sentences and paragraph-break indices.
    ///
    /// Total over all inputs: empty or whitespace-only text yields an empty
    /// result, malformed text degrades to best-effort segmentation. Calling
    /// twice on the same input returns structurally identical results.
    pub fn split_with_breaks(&self, text: &str) -> Segmentation {
        if text.trim().is_empty() {
            return Segmentation::default();
        }

        let text = normalize_line_endings(text);
        debug!("segmenting {} chars", text.chars().count());

        let result = if numbered::is_numbered_list(self, &text) {
            numbered::split_numbered(self, &text)
        } else {
            let prepared = prepare_prose(&text);
            let (raw, pending_breaks) = self.scan(&prepared);
            merge::merge_and_reindex(raw, pending_breaks)
        };

        debug!(
            sentences = result.sentences.len(),
            paragraph_breaks = result.paragraph_breaks.len(),
            "segmentation complete"
        );
        result
    }

    /// Convenience wrapper returning sentences only.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        self.split_with_breaks(text).sentences
    }

    /// Byte length of a line's leading numbering ("1.", "42."), if present.
    pub(crate) fn numbered_prefix_len(&self, line: &str) -> Option<usize> {
        let input = Input::new(line).anchored(Anchored::Yes);
        self.numbered_line.find(input).map(|m| m.end())
    }

    /// Run the prose pipeline on a single line of text (used per item in the
    /// numbered-list path, where line structure carries the paragraphing).
    pub(crate) fn split_line(&self, line: &str) -> Vec<String> {
        let prepared = prepare_prose(line);
        if prepared.is_empty() {
            return Vec::new();
        }
        let (raw, _) = self.scan(&prepared);
        merge::merge_and_reindex(raw, Vec::new()).sentences
    }

    /// Code-point scan over prepared prose. Returns raw sentences tagged with
    /// provisional ids plus the ids after which a paragraph break was seen.
    fn scan(&self, text: &str) -> (Vec<Provisional>, Vec<usize>) {
        let chars: Vec<char> = text.chars().collect();
        let mut sentences: Vec<Provisional> = Vec::new();
        let mut pending_breaks: Vec<usize> = Vec::new();
        let mut buffer = String::new();
        let mut next_id = 0usize;

        for i in 0..chars.len() {
            let ch = chars[i];
            buffer.push(ch);

            if !SENTENCE_ENDERS.contains(&ch) {
                continue;
            }

            // WHY: abbreviation exemptions only apply to ASCII enders; CJK
            // sentence-final punctuation never belongs to a token
            if ch.is_ascii() && self.trailing_token_is_non_terminal(&buffer) {
                continue;
            }

            let boundary = match chars.get(i + 1) {
                None => true,
                Some(&next) => next.is_whitespace() || next.is_ascii_uppercase() || is_cjk(next),
            };
            if !boundary {
                continue;
            }

            if let Some(id) = self.push_sentence(&mut sentences, &mut buffer, &mut next_id) {
                if paragraph_break_follows(&chars, i + 1) {
                    pending_breaks.push(id);
                }
            }
        }

        // Trailing text without a closing punctuation mark is still a sentence.
        self.push_sentence(&mut sentences, &mut buffer, &mut next_id);

        (sentences, pending_breaks)
    }

    fn trailing_token_is_non_terminal(&self, buffer: &str) -> bool {
        buffer
            .split_whitespace()
            .next_back()
            .is_some_and(|token| self.abbreviations.is_non_terminal_token(token))
    }

    /// Trim and push the buffer as a sentence, clearing it either way.
    /// Returns the provisional id when the sentence was accepted.
    fn push_sentence(
        &self,
        sentences: &mut Vec<Provisional>,
        buffer: &mut String,
        next_id: &mut usize,
    ) -> Option<usize> {
        let trimmed = buffer.trim();
        let accepted = !trimmed.is_empty()
            && !(self.options.filter_degenerate_sentences && is_degenerate(trimmed));

        let id = if accepted {
            let id = *next_id;
            sentences.push(Provisional {
                id,
                text: trimmed.to_string(),
            });
            *next_id += 1;
            Some(id)
        } else {
            None
        };

        buffer.clear();
        id
    }
}

/// CJK unified ideograph, the character class the word counter and the
/// boundary look-ahead both treat as Chinese text.
pub(crate) fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Collapse whitespace runs: two or more newlines become exactly two (one
/// paragraph gap), a single newline survives, anything else becomes one space.
fn prepare_prose(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if !ch.is_whitespace() {
            out.push(ch);
            continue;
        }

        let mut newlines = usize::from(ch == '\n');
        while let Some(&next) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            newlines += usize::from(next == '\n');
            chars.next();
        }
        match newlines {
            0 => out.push(' '),
            1 => out.push('\n'),
            _ => out.push_str("\n\n"),
        }
    }

    out.trim().to_string()
}

/// A paragraph break follows a boundary when the remaining text starts with a
/// blank line, or with a single newline directly before a capitalized line.
fn paragraph_break_follows(chars: &[char], pos: usize) -> bool {
    match chars.get(pos) {
        Some('\n') => match chars.get(pos + 1) {
            Some('\n') => true,
            Some(next) => next.is_ascii_uppercase(),
            None => false,
        },
        _ => false,
    }
}

/// The stricter legacy content filter: too short, or no word content at all.
fn is_degenerate(sentence: &str) -> bool {
    if sentence.chars().count() < 3 {
        return true;
    }

    let has_word_content = sentence
        .chars()
        .any(|c| c.is_ascii_alphanumeric() || c == '_' || is_cjk(c));
    if !has_word_content {
        return true;
    }

    // Digits and list punctuation only, e.g. "12.3 (4)".
    sentence.chars().all(|c| {
        c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '.' | ',' | '(' | ')')
    })
}
