//! Default configuration constants for ocrfix.
//!
//! Shared by the configuration types and the components that fall back to
//! them when constructed without a `Config`.

/// Default dictionary language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default SQLite correction history file, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "./corrections.db";

/// Minimum number of times a correction must have been recorded before its
/// words are added to the session dictionary at startup.
pub const PROMOTION_THRESHOLD: u32 = 2;

/// Maximum number of ranked suggestions shown or considered per token.
pub const SUGGESTION_LIMIT: usize = 10;

/// Maximum edit distance for oracle suggestions.
///
/// SymSpell precomputes deletes up to this distance, so lookups can never
/// exceed it.
pub const MAX_EDIT_DISTANCE: i64 = 2;

/// Number of neighbouring tokens shown (and stored) on each side of an error.
pub const CONTEXT_RADIUS: usize = 5;

/// Operator input that returns from a free-text prompt to the menu.
pub const BACK_TO_MENU: &str = "m";

/// Punctuation stripped from both ends of a token before dictionary lookup.
pub const PUNCT_TRIM: &[char] = &[
    '.', ',', '"', '\'', '-', ';', ':', '*', '?', '[', ']', '(', ')', '{', '}', '!',
];

/// Maximum number of words a squished token is split into.
pub const MAX_DESQUISH_WORDS: usize = 4;

/// Minimum length, in characters, of a desquished word or a boundary word.
pub const MIN_WORD_CHARS: usize = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_within_symspell_precompute() {
        assert!((1..=2).contains(&MAX_EDIT_DISTANCE));
    }

    #[test]
    fn punct_trim_contains_brackets_and_quotes() {
        for ch in ['[', ']', '(', ')', '{', '}', '"', '\''] {
            assert!(PUNCT_TRIM.contains(&ch), "missing {ch:?}");
        }
    }
}
