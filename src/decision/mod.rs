//! Deciding what happens to a flagged word.

pub mod engine;
pub mod menu;
pub mod prompt;

pub use engine::{DecisionEngine, Fallback, Flagged, Outcome, Resolution, Strategy};
pub use menu::{Choice, Menu, MenuAction, MenuKind};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};
