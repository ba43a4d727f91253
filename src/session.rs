//! Per-run context shared by every component.

use crate::config::Config;
use crate::error::Result;
use crate::history::CorrectionHistory;
use crate::oracle::{Dictionary, SymSpellDictionary, seed_session_words};

/// Everything one run needs: configuration, the dictionary with its
/// session vocabulary, and the correction history connection.
pub struct Session {
    pub config: Config,
    pub dictionary: Box<dyn Dictionary>,
    pub history: CorrectionHistory,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("language", &self.dictionary.language())
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Assemble a session from parts. Session words are not seeded.
    pub fn new(config: Config, dictionary: Box<dyn Dictionary>, history: CorrectionHistory) -> Self {
        Self {
            config,
            dictionary,
            history,
        }
    }

    /// Open the configured dictionary and history, then seed the session
    /// vocabulary from promoted corrections.
    ///
    /// Both failures are fatal: there is no useful run without either.
    pub fn open(config: Config) -> Result<Self> {
        let dictionary = SymSpellDictionary::open(&config.dictionary)?;
        let history = CorrectionHistory::open(&config.history.db_file)?;
        let mut session = Self::new(config, Box::new(dictionary), history);
        session.seed_from_history()?;
        Ok(session)
    }

    /// Add every fragment of every correction at or above the promotion
    /// threshold to the session vocabulary. Returns fragments added.
    pub fn seed_from_history(&mut self) -> Result<usize> {
        let threshold = self.config.dictionary.promotion_threshold;
        let promoted = self.history.promoted_corrections(threshold)?;
        let added = seed_session_words(
            self.dictionary.as_mut(),
            promoted.iter().map(String::as_str),
        );
        tracing::info!(
            threshold,
            corrections = promoted.len(),
            words = added,
            "seeded session vocabulary"
        );
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            Config::default(),
            Box::new(SymSpellDictionary::from_words("en", ["the", "a"])),
            CorrectionHistory::open_in_memory().unwrap(),
        )
    }

    #[test]
    fn seed_uses_promotion_threshold() {
        let mut s = session();
        s.history.record_correction("cornfeld", "corn field", "", "", false).unwrap();
        s.history.record_correction("comfield", "corn field", "", "", false).unwrap();
        s.history.record_correction("Gofpel", "Gofpell", "", "", false).unwrap();

        assert_eq!(s.seed_from_history().unwrap(), 2);
        assert!(s.dictionary.check("corn"));
        assert!(s.dictionary.check("field"));
        assert!(!s.dictionary.check("Gofpell"));
    }

    #[test]
    fn seed_skips_removals() {
        let mut s = session();
        s.history.record_correction("~~", "", "", "", false).unwrap();
        s.history.record_correction("^^", "", "", "", false).unwrap();
        assert_eq!(s.seed_from_history().unwrap(), 0);
    }

    #[test]
    fn open_fails_without_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.dictionary.path = Some(dir.path().join("missing.txt"));
        config.history.db_file = dir.path().join("corrections.db");
        assert!(Session::open(config).is_err());
    }

    #[test]
    fn open_with_custom_dictionary_and_seeded_history() {
        let dir = tempfile::tempdir().unwrap();
        let dict_path = dir.path().join("words.txt");
        std::fs::write(&dict_path, "the 100\nfox 50\n").unwrap();
        let db_path = dir.path().join("corrections.db");
        {
            let history = CorrectionHistory::open(&db_path).unwrap();
            history.record_correction("qick", "quick", "", "", false).unwrap();
            history.record_correction("qiuck", "quick", "", "", false).unwrap();
        }

        let mut config = Config::default();
        config.dictionary.path = Some(dict_path);
        config.history.db_file = db_path;
        let s = Session::open(config).unwrap();
        assert!(s.dictionary.check("fox"));
        assert!(s.dictionary.check("quick"));
    }
}
