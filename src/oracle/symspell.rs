//! SymSpell-backed dictionary oracle.
//!
//! Membership is answered from the loaded word set; suggestions come from a
//! SymSpell index built over the same words, so both always agree on what
//! the vocabulary is.

use crate::config::DictionaryConfig;
use crate::defaults;
use crate::dictionary::{dictionary_path, get_dictionary};
use crate::error::{OcrfixError, Result};
use crate::oracle::Dictionary;
use std::collections::HashSet;
use std::path::Path;
use symspell::{SymSpell, UnicodeStringStrategy, Verbosity};

/// Dictionary oracle over a word-frequency list.
pub struct SymSpellDictionary {
    symspell: SymSpell<UnicodeStringStrategy>,
    words: HashSet<String>,
    session: HashSet<String>,
    language: String,
    max_edit_distance: i64,
}

impl std::fmt::Debug for SymSpellDictionary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymSpellDictionary")
            .field("language", &self.language)
            .field("words", &self.words.len())
            .field("session", &self.session.len())
            .finish_non_exhaustive()
    }
}

impl SymSpellDictionary {
    fn empty(language: &str, max_edit_distance: i64) -> Self {
        Self {
            symspell: SymSpell::default(),
            words: HashSet::new(),
            session: HashSet::new(),
            language: language.to_string(),
            max_edit_distance: max_edit_distance.clamp(1, defaults::MAX_EDIT_DISTANCE),
        }
    }

    /// Open the dictionary described by `config`.
    ///
    /// A custom `path` wins; otherwise the catalog dictionary for the
    /// language must be installed. There is no degraded mode: without a
    /// dictionary nothing can be flagged reliably.
    pub fn open(config: &DictionaryConfig) -> Result<Self> {
        let language = config.language.as_str();
        let path = match &config.path {
            Some(custom) => {
                if !custom.is_file() {
                    return Err(OcrfixError::DictionaryLoad {
                        path: custom.display().to_string(),
                        message: "file not found".to_string(),
                    });
                }
                custom.clone()
            }
            None => {
                if get_dictionary(language).is_none() {
                    return Err(OcrfixError::UnsupportedLanguage {
                        language: language.to_string(),
                    });
                }
                let path = dictionary_path(language).ok_or_else(|| {
                    OcrfixError::UnsupportedLanguage {
                        language: language.to_string(),
                    }
                })?;
                if !path.is_file() {
                    return Err(OcrfixError::DictionaryNotInstalled {
                        language: language.to_string(),
                        path: path.display().to_string(),
                    });
                }
                path
            }
        };
        Self::from_file(&path, language, config.max_edit_distance)
    }

    /// Load a dictionary from file.
    ///
    /// One entry per line: `word frequency`, or a bare `word` (frequency 1)
    /// so plain word lists work too. Lines with a non-numeric frequency are
    /// skipped.
    pub fn from_file(path: &Path, language: &str, max_edit_distance: i64) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OcrfixError::DictionaryLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut dict = Self::empty(language, max_edit_distance);
        let mut skipped = 0usize;
        for line in content.lines() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            match parts.next().map(str::parse::<i64>) {
                None => dict.insert(word, 1),
                Some(Ok(freq)) if freq > 0 => dict.insert(word, freq),
                Some(_) => skipped += 1,
            }
        }

        tracing::debug!(
            language,
            path = %path.display(),
            words = dict.words.len(),
            skipped,
            "dictionary loaded"
        );
        Ok(dict)
    }

    /// Build a dictionary from an in-memory word list.
    ///
    /// Earlier words get higher frequencies, so suggestion order among
    /// equally distant candidates follows the list order.
    pub fn from_words<I, S>(language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<S> = words.into_iter().collect();
        let mut dict = Self::empty(language, defaults::MAX_EDIT_DISTANCE);
        let total = words.len() as i64;
        for (i, word) in words.iter().enumerate() {
            dict.insert(word.as_ref(), total - i as i64);
        }
        dict
    }

    fn insert(&mut self, word: &str, frequency: i64) {
        if self
            .symspell
            .load_dictionary_line(&format!("{} {}", word, frequency), 0, 1, " ")
        {
            self.words.insert(word.to_string());
        }
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(word) || self.session.contains(word)
    }

    /// Number of words loaded from the dictionary source (session words excluded).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for SymSpellDictionary {
    fn check(&self, word: &str) -> bool {
        if self.contains(word) {
            return true;
        }
        match letter_case(word) {
            LetterCase::Capitalized | LetterCase::Upper => self.contains(&word.to_lowercase()),
            LetterCase::Lower | LetterCase::Mixed => false,
        }
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        let case = letter_case(word);
        let lookup = word.to_lowercase();
        let mut seen = HashSet::new();
        self.symspell
            .lookup(&lookup, Verbosity::All, self.max_edit_distance)
            .into_iter()
            .map(|s| apply_case(&s.term, case))
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    fn add_session_word(&mut self, word: &str) {
        if word.is_empty() || self.contains(word) {
            return;
        }
        self.session.insert(word.to_string());
        // Suggestible too, with the lowest frequency
        let _loaded = self
            .symspell
            .load_dictionary_line(&format!("{} 1", word), 0, 1, " ");
    }

    fn language(&self) -> &str {
        &self.language
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LetterCase {
    Lower,
    Capitalized,
    Upper,
    Mixed,
}

fn letter_case(word: &str) -> LetterCase {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    let Some((first, rest)) = letters.split_first() else {
        return LetterCase::Lower;
    };
    if letters.iter().all(|c| c.is_lowercase()) {
        LetterCase::Lower
    } else if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        LetterCase::Upper
    } else if first.is_uppercase() && rest.iter().all(|c| c.is_lowercase()) {
        LetterCase::Capitalized
    } else {
        LetterCase::Mixed
    }
}

fn apply_case(term: &str, case: LetterCase) -> String {
    match case {
        LetterCase::Upper => term.to_uppercase(),
        LetterCase::Capitalized => {
            let mut chars = term.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        LetterCase::Lower | LetterCase::Mixed => term.to_string(),
    }
}
