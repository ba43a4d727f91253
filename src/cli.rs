//! Command-line interface for ocrfix
//!
//! Provides argument parsing using clap derive macros.

use crate::decision::engine::Fallback;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Interactive and automatic correction of OCR text
#[derive(Parser, Debug)]
#[command(
    name = "ocrfix",
    version,
    about = "Interactive and automatic correction of OCR text"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose diagnostics (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Correction history database (default: ./corrections.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db_file: Option<PathBuf>,

    /// Dictionary language code (default: en)
    #[arg(long, global = true, value_name = "LANG")]
    pub lang: Option<String>,

    /// Custom dictionary file (`word [frequency]` per line)
    #[arg(long, global = true, value_name = "PATH")]
    pub dictionary: Option<PathBuf>,

    /// Times a correction must have been chosen before its words count as valid
    #[arg(long, global = true, value_name = "N")]
    pub dict_threshold: Option<u32>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean raw OCR text (line wraps, page numbers, noise) into an output directory
    Prepare {
        /// File, or directory of *.txt files
        path: PathBuf,
        /// Where prepared files are written
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: PathBuf,
    },

    /// Walk through every flagged word and decide interactively
    Train {
        /// File, or directory of *.txt files
        path: PathBuf,
        /// Neither record decisions nor write files
        #[arg(long)]
        dry_run: bool,
        /// Offer only the basic menu
        #[arg(long)]
        basic: bool,
    },

    /// Apply the top-ranked suggestion to every flagged word
    Correct {
        /// File, or directory of *.txt files
        path: PathBuf,
        /// Write corrected files here instead of in place
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Do not write files
        #[arg(long)]
        dry_run: bool,
        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Split squished words into their dictionary parts
    Unsquish {
        /// File, or directory of *.txt files
        path: PathBuf,
        /// What to do with words that cannot be split (skip, automatic)
        #[arg(long, value_name = "MODE", default_value = "skip")]
        fallback: Fallback,
        /// Write files here instead of in place
        #[arg(long, short = 'o', value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// Do not write files
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete every stored correction
    Reset {
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Show correction history statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage dictionaries
    Dictionaries {
        /// Action to perform
        #[command(subcommand)]
        action: DictionariesAction,
    },

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value by key (e.g., dictionary.language)
    Get {
        /// Dotted key path (e.g., dictionary.language, suggestions.limit)
        key: String,
    },
    /// Set a configuration value by key
    Set {
        /// Dotted key path (e.g., dictionary.language, suggestions.limit)
        key: String,
        /// Value to set
        value: String,
    },
    /// List current configuration values (optionally one section)
    List {
        /// Config section to show (e.g., dictionary, train)
        section: Option<String>,
    },
    /// Dump a commented configuration template
    Dump,
}

/// Dictionary management actions
#[derive(Subcommand, Debug)]
pub enum DictionariesAction {
    /// List available dictionaries
    List,
    /// Download and install a dictionary
    Install {
        /// Language code (e.g., en, de)
        language: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["ocrfix"]).is_err());
    }

    #[test]
    fn test_parse_train_defaults() {
        let cli = Cli::try_parse_from(["ocrfix", "train", "book.txt"]).unwrap();
        match cli.command {
            Commands::Train {
                path,
                dry_run,
                basic,
            } => {
                assert_eq!(path, PathBuf::from("book.txt"));
                assert!(!dry_run);
                assert!(!basic);
            }
            _ => panic!("Expected Train command"),
        }
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
        assert!(cli.db_file.is_none());
        assert!(cli.lang.is_none());
        assert!(cli.dict_threshold.is_none());
    }

    #[test]
    fn test_parse_verbose_repeated_flags() {
        let cli = Cli::try_parse_from(["ocrfix", "stats", "-v", "-v"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = Cli::try_parse_from(["ocrfix", "-vv", "stats"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ocrfix",
            "correct",
            "pages/",
            "--db-file",
            "/tmp/c.db",
            "--lang",
            "de",
            "--dict-threshold",
            "3",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.db_file, Some(PathBuf::from("/tmp/c.db")));
        assert_eq!(cli.lang.as_deref(), Some("de"));
        assert_eq!(cli.dict_threshold, Some(3));
        match cli.command {
            Commands::Correct {
                json, output_dir, ..
            } => {
                assert!(json);
                assert!(output_dir.is_none());
            }
            _ => panic!("Expected Correct command"),
        }
    }

    #[test]
    fn test_parse_unsquish_fallback() {
        let cli = Cli::try_parse_from(["ocrfix", "unsquish", "a.txt"]).unwrap();
        match cli.command {
            Commands::Unsquish { fallback, .. } => assert_eq!(fallback, Fallback::Skip),
            _ => panic!("Expected Unsquish command"),
        }
        let cli =
            Cli::try_parse_from(["ocrfix", "unsquish", "a.txt", "--fallback", "automatic"]).unwrap();
        match cli.command {
            Commands::Unsquish { fallback, .. } => assert_eq!(fallback, Fallback::Automatic),
            _ => panic!("Expected Unsquish command"),
        }
        assert!(Cli::try_parse_from(["ocrfix", "unsquish", "a.txt", "--fallback", "maybe"]).is_err());
    }

    #[test]
    fn test_parse_prepare_requires_output_dir() {
        assert!(Cli::try_parse_from(["ocrfix", "prepare", "raw/"]).is_err());
        let cli = Cli::try_parse_from(["ocrfix", "prepare", "raw/", "-o", "clean/"]).unwrap();
        match cli.command {
            Commands::Prepare { output_dir, .. } => assert_eq!(output_dir, PathBuf::from("clean/")),
            _ => panic!("Expected Prepare command"),
        }
    }

    #[test]
    fn test_parse_reset_yes() {
        let cli = Cli::try_parse_from(["ocrfix", "reset", "--yes"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: true }));
        let cli = Cli::try_parse_from(["ocrfix", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: false }));
    }

    #[test]
    fn test_parse_dictionaries_install() {
        let cli = Cli::try_parse_from(["ocrfix", "dictionaries", "install", "fr"]).unwrap();
        match cli.command {
            Commands::Dictionaries {
                action: DictionariesAction::Install { language },
            } => assert_eq!(language, "fr"),
            _ => panic!("Expected Dictionaries Install"),
        }
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::try_parse_from(["ocrfix", "config", "set", "suggestions.limit", "5"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "suggestions.limit");
                assert_eq!(value, "5");
            }
            _ => panic!("Expected Config Set"),
        }
    }

    #[test]
    fn test_parse_config_list_with_section() {
        let cli = Cli::try_parse_from(["ocrfix", "config", "list", "train"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::List { section },
            } => assert_eq!(section.as_deref(), Some("train")),
            _ => panic!("Expected Config List"),
        }
    }

    #[test]
    fn test_parse_completions() {
        let cli = Cli::try_parse_from(["ocrfix", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Bash }
        ));
    }
}
