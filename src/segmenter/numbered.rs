// WHY: Documents that are mostly numbered lines ("1. ...", "2. ...") are lists,
// not prose. Treating each line as its own item keeps the numbering attached to
// the item text and puts a visual gap between items.

use super::Segmenter;
use super::Segmentation;

/// A document is a numbered list when more than half of its non-empty lines
/// start with a digit sequence followed by a period.
pub(super) fn is_numbered_list(segmenter: &Segmenter, text: &str) -> bool {
    let mut non_empty = 0usize;
    let mut numbered = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_empty += 1;
        if segmenter.numbered_prefix_len(trimmed).is_some() {
            numbered += 1;
        }
    }

    non_empty > 0 && numbered * 2 > non_empty
}

/// Split a numbered-list document line by line. Each line's numbering is
/// stripped before sentence-splitting and re-attached to the line's first
/// sentence; a paragraph break follows a line whenever the next line is blank
/// or starts its own item.
pub(super) fn split_numbered(segmenter: &Segmenter, text: &str) -> Segmentation {
    let lines: Vec<&str> = text.lines().collect();
    let mut sentences: Vec<String> = Vec::new();
    let mut paragraph_breaks: Vec<usize> = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match segmenter.numbered_prefix_len(trimmed) {
            Some(marker_end) => {
                let marker = &trimmed[..marker_end];
                let item_text = trimmed[marker_end..].trim_start();
                let mut line_sentences = segmenter.split_line(item_text);
                match line_sentences.first_mut() {
                    Some(first) => *first = format!("{marker} {first}"),
                    // A bare marker line still counts as one sentence.
                    None => line_sentences.push(marker.to_string()),
                }
                sentences.extend(line_sentences);
            }
            None => sentences.extend(segmenter.split_line(trimmed)),
        }

        if sentences.is_empty() {
            continue;
        }

        let next_starts_item = match lines.get(line_index + 1) {
            Some(next_line) => {
                let next_trimmed = next_line.trim();
                next_trimmed.is_empty() || segmenter.numbered_prefix_len(next_trimmed).is_some()
            }
            None => false,
        };
        if next_starts_item {
            paragraph_breaks.push(sentences.len() - 1);
        }
    }

    paragraph_breaks.retain(|&index| index + 1 < sentences.len());
    paragraph_breaks.dedup();

    Segmentation {
        sentences,
        paragraph_breaks,
    }
}

#[cfg(test)]
mod tests {
    use crate::segmenter::Segmenter;

    fn segmenter() -> Segmenter {
        Segmenter::with_default_options().expect("segmenter construction")
    }

    #[test]
    fn test_majority_of_numbered_lines_triggers_list_mode() {
        let segmenter = segmenter();
        let listy = "1. First item.\n2. Second item.\n3. Third item.";
        assert!(super::is_numbered_list(&segmenter, listy));

        let prose = "This is prose.\nStill prose here.\n1. A lone numbered line.";
        assert!(!super::is_numbered_list(&segmenter, prose));
    }

    #[test]
    fn test_items_keep_their_numbering() {
        let result = segmenter().split_with_breaks("1. First item.\n2. Second item.");
        assert_eq!(
            result.sentences,
            vec!["1. First item.".to_string(), "2. Second item.".to_string()]
        );
        assert_eq!(result.paragraph_breaks, vec![0]);
    }

    #[test]
    fn test_multi_sentence_item_prefixes_only_the_first() {
        let result = segmenter().split_with_breaks(
            "1. The journey started early. Everyone was ready to leave.\n2. The weather turned bad.",
        );
        assert_eq!(
            result.sentences,
            vec![
                "1. The journey started early.".to_string(),
                "Everyone was ready to leave.".to_string(),
                "2. The weather turned bad.".to_string(),
            ]
        );
        assert_eq!(result.paragraph_breaks, vec![1]);
    }

    #[test]
    fn test_blank_line_between_items_still_breaks_once() {
        let result = segmenter().split_with_breaks("1. First item.\n\n2. Second item.");
        assert_eq!(result.sentences.len(), 2);
        assert_eq!(result.paragraph_breaks, vec![0]);
    }

    #[test]
    fn test_no_break_after_final_item() {
        let result = segmenter().split_with_breaks("1. Only item here.");
        assert_eq!(result.sentences, vec!["1. Only item here.".to_string()]);
        assert!(result.paragraph_breaks.is_empty());
    }

    #[test]
    fn test_bare_marker_line_survives_as_sentence() {
        let result = segmenter().split_with_breaks("1. First item.\n2.\n3. Third item.");
        assert_eq!(
            result.sentences,
            vec![
                "1. First item.".to_string(),
                "2.".to_string(),
                "3. Third item.".to_string(),
            ]
        );
    }
}
