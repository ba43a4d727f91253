//! Interactive menu: fixed actions plus numbered suggestions.

/// A fixed menu entry, keyed by a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Skip,
    Quit,
    EnterCustom,
    ExpandContext,
    JoinHyphens,
    ExplodeHyphens,
    Keep,
    Whitelist,
    Remove,
    Autocorrect,
    Desquish,
}

impl MenuAction {
    pub const BASIC: &'static [MenuAction] = &[
        MenuAction::Skip,
        MenuAction::Quit,
        MenuAction::EnterCustom,
        MenuAction::ExpandContext,
        MenuAction::Keep,
        MenuAction::Remove,
    ];

    pub const EXTENDED: &'static [MenuAction] = &[
        MenuAction::Skip,
        MenuAction::Quit,
        MenuAction::EnterCustom,
        MenuAction::ExpandContext,
        MenuAction::JoinHyphens,
        MenuAction::ExplodeHyphens,
        MenuAction::Keep,
        MenuAction::Whitelist,
        MenuAction::Remove,
        MenuAction::Autocorrect,
        MenuAction::Desquish,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuAction::Skip => "s",
            MenuAction::Quit => "q",
            MenuAction::EnterCustom => "e",
            MenuAction::ExpandContext => "c",
            MenuAction::JoinHyphens => "j",
            MenuAction::ExplodeHyphens => "x",
            MenuAction::Keep => "k",
            MenuAction::Whitelist => "w",
            MenuAction::Remove => "r",
            MenuAction::Autocorrect => "a",
            MenuAction::Desquish => "u",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Skip => "Skip",
            MenuAction::Quit => "Quit",
            MenuAction::EnterCustom => "Enter custom value",
            MenuAction::ExpandContext => "Correct expanded context",
            MenuAction::JoinHyphens => "Join at hyphen(s)",
            MenuAction::ExplodeHyphens => "Explode at hyphen(s)",
            MenuAction::Keep => "Keep as-is",
            MenuAction::Whitelist => "Whitelist",
            MenuAction::Remove => "Remove",
            MenuAction::Autocorrect => "Autocorrect with 1st suggestion",
            MenuAction::Desquish => "Desquish",
        }
    }

    /// Decisions likely to hold forever; their records are re-applied
    /// silently in later runs.
    pub fn is_auto(self) -> bool {
        matches!(
            self,
            MenuAction::Whitelist
                | MenuAction::Autocorrect
                | MenuAction::JoinHyphens
                | MenuAction::ExplodeHyphens
        )
    }

    /// Every key any menu can use.
    pub fn all_keys() -> impl Iterator<Item = &'static str> {
        Self::EXTENDED.iter().map(|a| a.key())
    }

    /// Every label any menu can show.
    pub fn all_labels() -> impl Iterator<Item = &'static str> {
        Self::EXTENDED.iter().map(|a| a.label())
    }
}

/// Which fixed actions a menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuKind {
    Basic,
    #[default]
    Extended,
}

impl MenuKind {
    pub fn actions(self) -> &'static [MenuAction] {
        match self {
            MenuKind::Basic => MenuAction::BASIC,
            MenuKind::Extended => MenuAction::EXTENDED,
        }
    }
}

/// What the operator picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Action(MenuAction),
    /// Zero-based index into the menu's suggestions.
    Suggestion(usize),
}

/// A rendered-ready menu for one flagged word.
#[derive(Debug, Clone)]
pub struct Menu {
    pub kind: MenuKind,
    pub suggestions: Vec<String>,
}

impl Menu {
    pub fn new(kind: MenuKind, suggestions: Vec<String>) -> Self {
        Self { kind, suggestions }
    }

    pub fn actions(&self) -> &'static [MenuAction] {
        self.kind.actions()
    }

    /// Entries in display order: fixed actions, then suggestions numbered from 1.
    pub fn entries(&self) -> Vec<(String, String)> {
        let fixed = self
            .actions()
            .iter()
            .map(|a| (a.key().to_string(), a.label().to_string()));
        let numbered = self
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| ((i + 1).to_string(), s.clone()));
        fixed.chain(numbered).collect()
    }

    /// Interpret operator input. Empty input is the default, Skip.
    /// `None` for anything this menu does not offer.
    pub fn parse(&self, input: &str) -> Option<Choice> {
        let input = input.trim();
        if input.is_empty() {
            return Some(Choice::Action(MenuAction::Skip));
        }
        if let Some(action) = self.actions().iter().find(|a| a.key() == input) {
            return Some(Choice::Action(*action));
        }
        match input.parse::<usize>() {
            Ok(n) if n >= 1 && n <= self.suggestions.len() => Some(Choice::Suggestion(n - 1)),
            _ => None,
        }
    }
}
