//! Splitting of squished words: `cornfield` -> `corn field`.
//!
//! OCR regularly drops the space between two words. A squished token is
//! repaired by finding 2 to 4 dictionary words that concatenate to exactly
//! the token.

use crate::defaults::{MAX_DESQUISH_WORDS, MIN_WORD_CHARS};
use crate::oracle::Dictionary;

/// Fragments that are technically in the dictionary but almost never the
/// right split: abbreviations, archaisms, word pieces.
pub const FRAGMENT_BLACKLIST: &[&str] = &[
    "ac", "alb", "ba", "bl", "ca", "ch", "com", "ctr", "dd", "de", "din", "don", "eccl", "elfin",
    "en", "er", "es", "est", "et", "eu", "fr", "fro", "gs", "ha", "hi", "hings", "ho", "hon", "ht",
    "id", "inf", "int", "ish", "ism", "la", "lexis", "lo", "ma", "mags", "mam", "mas", "mes", "mi",
    "min", "mus", "na", "nit", "nits", "nowt", "ow", "pi", "pow", "pre", "rah", "re", "rec",
    "religio", "soc", "tr", "un", "uni", "wert", "wit", "yin", "yo", "yous",
];

/// Word segmenter backed by a dictionary.
#[derive(Debug, Clone)]
pub struct Desquisher {
    blacklist: Vec<String>,
    max_words: usize,
}

impl Default for Desquisher {
    fn default() -> Self {
        Self {
            blacklist: FRAGMENT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
            max_words: MAX_DESQUISH_WORDS,
        }
    }
}

impl Desquisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best segmentation of `token`, space-joined.
    ///
    /// Every segmentation into 2 to 4 acceptable words is enumerated depth
    /// first (shorter prefixes first); the one with the fewest words wins,
    /// earliest found on ties. `None` when nothing fits.
    pub fn desquish(&self, token: &str, dictionary: &dyn Dictionary) -> Option<String> {
        let mut found: Vec<Vec<&str>> = Vec::new();
        let mut path: Vec<&str> = Vec::with_capacity(self.max_words);
        self.search(token, dictionary, &mut path, &mut found);

        let best = found.into_iter().min_by_key(Vec::len)?;
        tracing::debug!(token, words = best.len(), "desquished");
        Some(best.join(" "))
    }

    fn search<'a>(
        &self,
        rest: &'a str,
        dictionary: &dyn Dictionary,
        path: &mut Vec<&'a str>,
        found: &mut Vec<Vec<&'a str>>,
    ) {
        if path.len() == self.max_words {
            return;
        }
        for end in prefix_ends(rest) {
            let word = &rest[..end];
            if !self.is_acceptable(word, dictionary) {
                continue;
            }
            path.push(word);
            let remainder = &rest[end..];
            if remainder.is_empty() {
                if path.len() >= 2 {
                    found.push(path.clone());
                }
            } else {
                self.search(remainder, dictionary, path, found);
            }
            path.pop();
        }
    }

    fn is_acceptable(&self, word: &str, dictionary: &dyn Dictionary) -> bool {
        if word.chars().count() < MIN_WORD_CHARS {
            return false;
        }
        let lower = word.to_lowercase();
        !self.blacklist.iter().any(|b| *b == lower) && dictionary.check(word)
    }
}

/// Byte offsets ending each non-empty prefix of `s`, shortest first.
fn prefix_ends(s: &str) -> impl Iterator<Item = usize> + '_ {
    s.char_indices()
        .skip(1)
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
}
