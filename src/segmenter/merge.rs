// WHY: Short fragments produced by the scanner (unclosed quotations, clipped
// interjections) read badly on their own, so a single merge pass glues them to
// their successor. Paragraph breaks are recorded against provisional ids before
// this pass runs and must be remapped through the merge.

use std::collections::HashMap;

use super::{Provisional, Segmentation, SENTENCE_ENDERS};

/// Sentences below this many chars are candidates for merging.
const MERGE_CANDIDATE_MAX_CHARS: usize = 20;

/// Fragments below this many chars without terminal punctuation always merge.
const SHORT_FRAGMENT_MAX_CHARS: usize = 15;

/// Run the merge pass over raw scanner output and remap pending paragraph
/// breaks (given as provisional ids) onto final sentence indices.
pub(super) fn merge_and_reindex(raw: Vec<Provisional>, pending_breaks: Vec<usize>) -> Segmentation {
    let mut merged: Vec<(Vec<usize>, String)> = Vec::with_capacity(raw.len());

    let mut i = 0;
    while i < raw.len() {
        let mut ids = vec![raw[i].id];
        let mut text = raw[i].text.clone();

        if text.chars().count() < MERGE_CANDIDATE_MAX_CHARS && i + 1 < raw.len() {
            let next = &raw[i + 1];
            if should_merge(&text, &next.text) {
                text.push(' ');
                text.push_str(&next.text);
                ids.push(next.id);
                i += 1; // consume the successor
            }
        }

        merged.push((ids, text));
        i += 1;
    }

    // WHY: a merged sentence owns every provisional id it absorbed, so a break
    // recorded after a consumed fragment lands after the merged sentence
    let mut index_of_id: HashMap<usize, usize> = HashMap::new();
    for (index, (ids, _)) in merged.iter().enumerate() {
        for id in ids {
            index_of_id.insert(*id, index);
        }
    }

    let sentences: Vec<String> = merged.into_iter().map(|(_, text)| text).collect();

    let mut paragraph_breaks: Vec<usize> = pending_breaks
        .iter()
        .filter_map(|id| index_of_id.get(id).copied())
        .filter(|&index| index + 1 < sentences.len())
        .collect();
    paragraph_breaks.sort_unstable();
    paragraph_breaks.dedup();

    Segmentation {
        sentences,
        paragraph_breaks,
    }
}

/// Merge when the current fragment opens a quotation the successor closes, or
/// when it is short and lacks terminal punctuation.
fn should_merge(current: &str, next: &str) -> bool {
    let opens_quote = current.chars().next().is_some_and(is_quote);
    let ends_quote = current.chars().next_back().is_some_and(is_quote);
    let next_ends_quote = next.chars().next_back().is_some_and(is_quote);

    if opens_quote && !ends_quote && next_ends_quote {
        return true;
    }

    let ends_terminal = current
        .chars()
        .next_back()
        .is_some_and(|c| SENTENCE_ENDERS.contains(&c));

    current.chars().count() < SHORT_FRAGMENT_MAX_CHARS && !ends_terminal
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'' | '\u{201C}' | '\u{201D}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisional(texts: &[&str]) -> Vec<Provisional> {
        texts
            .iter()
            .enumerate()
            .map(|(id, text)| Provisional {
                id,
                text: (*text).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_unclosed_quote_merges_with_closer() {
        let raw = provisional(&["\u{201C}Stop!", "he shouted loudly.\u{201D}", "Then silence fell."]);
        let result = merge_and_reindex(raw, Vec::new());
        assert_eq!(
            result.sentences,
            vec![
                "\u{201C}Stop! he shouted loudly.\u{201D}".to_string(),
                "Then silence fell.".to_string(),
            ]
        );
    }

    #[test]
    fn test_short_fragment_without_punctuation_merges() {
        let raw = provisional(&["And yet", "Nothing happened at all that day."]);
        let result = merge_and_reindex(raw, Vec::new());
        assert_eq!(
            result.sentences,
            vec!["And yet Nothing happened at all that day.".to_string()]
        );
    }

    #[test]
    fn test_short_terminal_sentence_is_not_merged() {
        let raw = provisional(&["Hello world.", "How are you?"]);
        let result = merge_and_reindex(raw, Vec::new());
        assert_eq!(result.sentences.len(), 2);
    }

    #[test]
    fn test_break_on_consumed_fragment_maps_to_merged_sentence() {
        let raw = provisional(&["And so", "The chapter came to its end.", "A new day began quietly."]);
        // Break recorded after provisional id 1, which gets absorbed into index 0.
        let result = merge_and_reindex(raw, vec![1]);
        assert_eq!(result.sentences.len(), 2);
        assert_eq!(result.paragraph_breaks, vec![0]);
    }

    #[test]
    fn test_break_after_last_sentence_is_dropped() {
        let raw = provisional(&["First sentence here.", "Second sentence here."]);
        let result = merge_and_reindex(raw, vec![1]);
        assert_eq!(result.paragraph_breaks, Vec::<usize>::new());
    }

    #[test]
    fn test_breaks_are_sorted_and_deduplicated() {
        let raw = provisional(&["One sentence here.", "Two sentences here.", "Three sentences here."]);
        let result = merge_and_reindex(raw, vec![1, 0, 1]);
        assert_eq!(result.paragraph_breaks, vec![0, 1]);
    }
}
