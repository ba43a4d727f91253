//! Dictionary oracle: the ground truth for "is this a real word".

pub mod symspell;

pub use self::symspell::SymSpellDictionary;

/// Spell-check capability consumed by the rest of the crate.
///
/// `check` decides whether a token gets flagged at all; `suggest` only feeds
/// the candidate pool, its order is a hint the ranker preserves.
pub trait Dictionary {
    /// Whether `word` is a valid word in this dictionary or the session vocabulary.
    fn check(&self, word: &str) -> bool;

    /// Candidate replacements for `word`, best first.
    fn suggest(&self, word: &str) -> Vec<String>;

    /// Accept `word` as valid for the rest of this run.
    fn add_session_word(&mut self, word: &str);

    /// Language code of the loaded dictionary.
    fn language(&self) -> &str;
}

/// Seed the session vocabulary from promoted corrections.
///
/// Each correction is split on spaces and hyphens and every non-empty
/// fragment becomes a session word, so a trusted "corn field" makes both
/// "corn" and "field" valid. Returns the number of fragments added.
pub fn seed_session_words<'a>(
    dictionary: &mut dyn Dictionary,
    corrections: impl IntoIterator<Item = &'a str>,
) -> usize {
    let mut added = 0;
    for correction in corrections {
        for fragment in correction.split([' ', '-']).filter(|f| !f.is_empty()) {
            dictionary.add_session_word(fragment);
            added += 1;
        }
    }
    added
}
