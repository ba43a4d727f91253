//! Decision engine: turns one flagged word into an outcome.
//!
//! One state machine serves every mode; the `Strategy` decides whether a
//! human is asked, the top suggestion is taken, or the word is split.

use crate::decision::menu::{Choice, Menu, MenuAction, MenuKind};
use crate::decision::prompt::Prompter;
use crate::defaults::BACK_TO_MENU;
use crate::desquish::Desquisher;
use crate::error::Result;
use crate::output;
use crate::ranker::SuggestionRanker;
use crate::session::Session;

/// What the desquish strategy does with words it cannot split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    #[default]
    Skip,
    Automatic,
}

impl std::str::FromStr for Fallback {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Fallback::Skip),
            "automatic" | "auto" => Ok(Fallback::Automatic),
            other => Err(format!("unknown fallback '{other}' (expected skip or automatic)")),
        }
    }
}

pub enum Strategy {
    /// Take the top-ranked suggestion. Nothing is recorded.
    Automatic,
    /// Ask the operator.
    Interactive {
        menu: MenuKind,
        prompter: Box<dyn Prompter>,
    },
    /// Split squished words. Nothing is recorded.
    Desquish { fallback: Fallback },
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Automatic => "automatic",
            Strategy::Interactive { .. } => "interactive",
            Strategy::Desquish { .. } => "desquish",
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Interactive { menu, .. } => f
                .debug_struct("Interactive")
                .field("menu", menu)
                .finish_non_exhaustive(),
            Strategy::Desquish { fallback } => f
                .debug_struct("Desquish")
                .field("fallback", fallback)
                .finish(),
            Strategy::Automatic => f.write_str("Automatic"),
        }
    }
}

/// A flagged word as the processor sees it.
#[derive(Debug, Clone, Copy)]
pub struct Flagged<'a> {
    /// Trimmed lookup form; this is what gets replaced.
    pub word: &'a str,
    /// Surrounding text with the word bracketed, stored with the record.
    pub context: &'a str,
    /// Previous token through next token in the current content.
    pub expanded: &'a str,
    /// Document the word came from.
    pub source: &'a str,
}

/// Replace `error` with `correction`; `fast_forward` skips the next token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub error: String,
    pub correction: String,
    pub fast_forward: bool,
}

impl Resolution {
    fn of(error: &str, correction: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            correction: correction.into(),
            fast_forward: false,
        }
    }

    pub fn is_removal(&self) -> bool {
        self.correction.is_empty()
    }

    pub fn is_unchanged(&self) -> bool {
        self.correction == self.error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Skipped,
    Quit,
    /// Applied without asking anyone.
    AutoApplied(Resolution),
    /// Chosen by the operator.
    ManualResolved(Resolution),
}

impl Outcome {
    pub fn resolution(&self) -> Option<&Resolution> {
        match self {
            Outcome::AutoApplied(r) | Outcome::ManualResolved(r) => Some(r),
            Outcome::Skipped | Outcome::Quit => None,
        }
    }
}

enum State {
    Detected,
    ExpandedContext,
}

pub struct DecisionEngine {
    strategy: Strategy,
    ranker: SuggestionRanker,
    desquisher: Desquisher,
    dry_run: bool,
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("strategy", &self.strategy)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl DecisionEngine {
    /// Engine with the given strategy. Action labels are reserved in the
    /// ranker so no suggestion reads like an action.
    pub fn new(strategy: Strategy, suggestion_limit: usize) -> Self {
        Self {
            strategy,
            ranker: SuggestionRanker::new(suggestion_limit).with_reserved(MenuAction::all_labels()),
            desquisher: Desquisher::new(),
            dry_run: false,
        }
    }

    /// Dry runs never write records.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Decide what happens to one flagged word.
    ///
    /// Only read failures and prompt failures are errors; a failed record
    /// write is reported and the decision still stands.
    pub fn decide(&mut self, session: &mut Session, flagged: &Flagged<'_>) -> Result<Outcome> {
        let outcome = match &mut self.strategy {
            Strategy::Automatic => automatic(&self.ranker, session, flagged.word)?,
            Strategy::Desquish { fallback } => {
                match self
                    .desquisher
                    .desquish(flagged.word, session.dictionary.as_ref())
                {
                    Some(split) => Outcome::AutoApplied(Resolution::of(flagged.word, split)),
                    None => match fallback {
                        Fallback::Skip => Outcome::Skipped,
                        Fallback::Automatic => automatic(&self.ranker, session, flagged.word)?,
                    },
                }
            }
            Strategy::Interactive { menu, prompter } => {
                let ctx = Interaction {
                    ranker: &self.ranker,
                    desquisher: &self.desquisher,
                    dry_run: self.dry_run,
                };
                ctx.run(*menu, prompter.as_mut(), session, flagged)?
            }
        };

        tracing::debug!(
            word = flagged.word,
            strategy = self.strategy.name(),
            outcome = ?outcome,
            "decision"
        );
        Ok(outcome)
    }
}

fn automatic(ranker: &SuggestionRanker, session: &Session, word: &str) -> Result<Outcome> {
    let ranked = ranker.rank(word, &session.history, session.dictionary.as_ref())?;
    Ok(match ranked.into_iter().next() {
        Some(top) => Outcome::AutoApplied(Resolution::of(word, top)),
        None => Outcome::Skipped,
    })
}

struct Interaction<'e> {
    ranker: &'e SuggestionRanker,
    desquisher: &'e Desquisher,
    dry_run: bool,
}

impl Interaction<'_> {
    fn run(
        &self,
        kind: MenuKind,
        prompter: &mut dyn Prompter,
        session: &mut Session,
        flagged: &Flagged<'_>,
    ) -> Result<Outcome> {
        let word = flagged.word;

        if let Some(correction) = session.history.auto_correction_for(word)? {
            return Ok(Outcome::AutoApplied(Resolution::of(word, correction)));
        }

        let suggestions = self
            .ranker
            .rank(word, &session.history, session.dictionary.as_ref())?;
        let menu = Menu::new(kind, suggestions);
        let mut state = State::Detected;

        let (resolution, auto) = loop {
            match state {
                State::Detected => {
                    let action = match prompter.choose(&menu)? {
                        Choice::Suggestion(i) => match menu.suggestions.get(i) {
                            Some(s) => break (Resolution::of(word, s.clone()), false),
                            None => continue,
                        },
                        Choice::Action(action) => action,
                    };
                    let correction = match action {
                        MenuAction::Skip => {
                            output::skipped();
                            return Ok(Outcome::Skipped);
                        }
                        MenuAction::Quit => return Ok(Outcome::Quit),
                        MenuAction::ExpandContext => {
                            state = State::ExpandedContext;
                            continue;
                        }
                        MenuAction::EnterCustom => {
                            let value = prompter.ask(&format!(
                                "Enter custom value. Submit '{BACK_TO_MENU}' to go back to menu."
                            ))?;
                            if value == BACK_TO_MENU {
                                continue;
                            }
                            value
                        }
                        MenuAction::Keep => {
                            output::note("Kept as-is");
                            word.to_string()
                        }
                        MenuAction::Whitelist => {
                            session.dictionary.add_session_word(word);
                            output::note("Whitelisted");
                            word.to_string()
                        }
                        MenuAction::Remove => String::new(),
                        MenuAction::JoinHyphens => word.replace('-', ""),
                        MenuAction::ExplodeHyphens => word.replace('-', " "),
                        MenuAction::Autocorrect => match menu.suggestions.first() {
                            Some(first) => first.clone(),
                            None => {
                                output::note("No suggestions to autocorrect with");
                                continue;
                            }
                        },
                        MenuAction::Desquish => {
                            match self.desquisher.desquish(word, session.dictionary.as_ref()) {
                                Some(split) => split,
                                None => {
                                    output::note("No way to split this word");
                                    continue;
                                }
                            }
                        }
                    };
                    break (Resolution::of(word, correction), action.is_auto());
                }
                State::ExpandedContext => {
                    let value = prompter.ask(&format!(
                        "What would you like to replace \"{}\" with? Submit '{BACK_TO_MENU}' to go back to menu.",
                        flagged.expanded
                    ))?;
                    if value == BACK_TO_MENU {
                        state = State::Detected;
                        continue;
                    }
                    let resolution = Resolution {
                        error: flagged.expanded.to_string(),
                        correction: value,
                        fast_forward: true,
                    };
                    break (resolution, false);
                }
            }
        };

        if !self.dry_run {
            self.record(session, flagged, &resolution, auto);
        }
        Ok(Outcome::ManualResolved(resolution))
    }

    fn record(&self, session: &Session, flagged: &Flagged<'_>, resolution: &Resolution, auto: bool) {
        if let Err(e) = session.history.record_correction(
            &resolution.error,
            &resolution.correction,
            flagged.context,
            flagged.source,
            auto,
        ) {
            tracing::warn!(error = %e, word = %resolution.error, "failed to record correction");
            output::error("Error saving correction to database");
        }
    }
}
