//! ocrfix - trainable post-OCR spelling correction
//!
//! Flags words a dictionary doesn't know, ranks corrections from past human
//! decisions and the dictionary, and applies them automatically or through
//! an interactive menu. Every decision is remembered.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod decision;
pub mod defaults;
pub mod desquish;
pub mod dictionary;
#[cfg(feature = "dictionary-download")]
pub mod download;
pub mod error;
pub mod history;
pub mod logging;
pub mod oracle;
pub mod output;
pub mod patcher;
pub mod prepare;
pub mod processor;
pub mod ranker;
pub mod session;
pub mod tokenizer;

// Composition root
pub mod app;

// Core traits (oracle → decision)
pub use decision::prompt::Prompter;
pub use oracle::Dictionary;

// Components
pub use decision::engine::{DecisionEngine, Fallback, Outcome, Strategy};
pub use desquish::Desquisher;
pub use history::CorrectionHistory;
pub use oracle::SymSpellDictionary;
pub use processor::{FileProcessor, ProcessorOptions};
pub use ranker::SuggestionRanker;
pub use session::Session;

// Error handling
pub use error::{OcrfixError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
