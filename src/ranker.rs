//! Suggestion ranking: human history first, dictionary second.

use crate::defaults;
use crate::error::Result;
use crate::history::CorrectionHistory;
use crate::oracle::Dictionary;

/// Merges stored corrections with live dictionary suggestions.
#[derive(Debug, Clone)]
pub struct SuggestionRanker {
    limit: usize,
    reserved: Vec<String>,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::new(defaults::SUGGESTION_LIMIT)
    }
}

impl SuggestionRanker {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            reserved: Vec::new(),
        }
    }

    /// Oracle suggestions equal to one of these labels are dropped so a
    /// numbered suggestion can never be confused with a menu key.
    pub fn with_reserved<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ranked candidates for `word`.
    ///
    /// Stored corrections come first in store order (most voted first),
    /// then unseen oracle suggestions in oracle order. Never longer than
    /// the limit.
    pub fn rank(
        &self,
        word: &str,
        history: &CorrectionHistory,
        dictionary: &dyn Dictionary,
    ) -> Result<Vec<String>> {
        let mut ranked: Vec<String> = history
            .suggestions_for(word)?
            .into_iter()
            .map(|s| s.correction)
            .take(self.limit)
            .collect();

        for suggestion in dictionary.suggest(word) {
            if ranked.len() >= self.limit {
                break;
            }
            if ranked.contains(&suggestion) || self.reserved.contains(&suggestion) {
                continue;
            }
            ranked.push(suggestion);
        }

        tracing::trace!(word, candidates = ranked.len(), "ranked suggestions");
        Ok(ranked)
    }
}
