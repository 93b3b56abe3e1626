// WHY: Centralized abbreviation handling for sentence boundary detection
// A trailing token that matches here carries its period as part of the token,
// so the period must not be treated as a sentence end

use std::collections::HashSet;

/// Protected abbreviations that end in a period but never terminate a sentence.
/// Stored lowercase; lookups are case-insensitive.
pub const ABBREVIATIONS: &[&str] = &[
    // Titles
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.",
    // Academic degrees
    "ph.d.", "m.d.", "b.a.", "m.a.",
    // Countries and organizations
    "u.s.a.", "u.k.", "u.s.", "inc.", "corp.", "ltd.",
    // Misc
    "vs.", "etc.", "e.g.", "i.e.", "st.", "ave.", "blvd.", "rd.",
    "no.", "vol.", "pp.", "a.m.", "p.m.",
];

/// Efficient abbreviation lookup using HashSet for O(1) performance
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
        }
    }

    /// Check if a token is a known protected abbreviation (case-insensitive)
    pub fn is_abbreviation(&self, token: &str) -> bool {
        self.abbreviations.contains(token.to_ascii_lowercase().as_str())
    }

    /// Pure digit sequence plus period, e.g. "1." or "42." (numbered-list marker)
    pub fn is_numbered_marker(token: &str) -> bool {
        let mut chars = token.chars();
        match chars.next_back() {
            Some('.') => {}
            _ => return false,
        }
        let rest = chars.as_str();
        !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
    }

    /// Single capital letter plus period, e.g. "A." (an initial)
    pub fn is_initial(token: &str) -> bool {
        let mut chars = token.chars();
        matches!(
            (chars.next(), chars.next(), chars.next()),
            (Some(first), Some('.'), None) if first.is_ascii_uppercase()
        )
    }

    /// Short all-caps token plus period, e.g. "NASA." (an acronym)
    pub fn is_short_acronym(token: &str) -> bool {
        let mut chars = token.chars();
        match chars.next_back() {
            Some('.') => {}
            _ => return false,
        }
        let rest = chars.as_str();
        (1..=5).contains(&rest.chars().count())
            && rest.chars().all(|c| c.is_ascii_uppercase())
    }

    /// Decide whether a trailing token exempts the just-seen punctuation from
    /// forming a sentence boundary.
    pub fn is_non_terminal_token(&self, token: &str) -> bool {
        self.is_abbreviation(token)
            || Self::is_numbered_marker(token)
            || Self::is_initial(token)
            || Self::is_short_acronym(token)
    }
}

impl Default for AbbreviationChecker {
    fn default() -> Self {
        Self::new()
    }
}
