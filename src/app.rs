//! Mode entry points.
//!
//! Wires configuration, session, engine strategy and file processor
//! together for each subcommand:
//! discover files → open session → process → summarize

use crate::config::Config;
use crate::decision::engine::{DecisionEngine, Fallback, Strategy};
use crate::decision::menu::MenuKind;
use crate::decision::prompt::{Prompter, TerminalPrompter};
use crate::error::Result;
use crate::history::{CorrectionHistory, HistoryStats};
use crate::oracle::SymSpellDictionary;
use crate::output;
use crate::prepare::{PrepareOptions, PrepareReport, prepare_files};
use crate::processor::{FileProcessor, ProcessorOptions, RunReport, discover_files};
use crate::session::Session;
use std::path::{Path, PathBuf};

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_file: Option<PathBuf>,
    pub language: Option<String>,
    pub dictionary: Option<PathBuf>,
    pub dict_threshold: Option<u32>,
}

impl Overrides {
    /// Apply on top of `config` and validate the result.
    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(db_file) = &self.db_file {
            config.history.db_file = db_file.clone();
        }
        if let Some(language) = &self.language {
            config.dictionary.language = language.clone();
        }
        if let Some(path) = &self.dictionary {
            config.dictionary.path = Some(path.clone());
        }
        if let Some(threshold) = self.dict_threshold {
            config.dictionary.promotion_threshold = threshold;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Per-invocation switches shared by the processing modes.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub output_dir: Option<PathBuf>,
    pub quiet: bool,
}

impl RunOptions {
    fn processor_options(&self, config: &Config) -> ProcessorOptions {
        ProcessorOptions {
            dry_run: self.dry_run,
            output_dir: self.output_dir.clone(),
            skip_hyphenated: config.detection.skip_hyphenated,
            context_radius: config.train.context_radius,
            quiet: self.quiet,
        }
    }
}

/// Process every document under `path` with one engine strategy.
///
/// Decisions are not recorded on a dry run.
pub fn run_mode(
    session: &mut Session,
    path: &Path,
    strategy: Strategy,
    options: &RunOptions,
) -> Result<RunReport> {
    let files = discover_files(path)?;
    tracing::info!(
        mode = strategy.name(),
        files = files.len(),
        dry_run = options.dry_run,
        "starting run"
    );

    let engine = DecisionEngine::new(strategy, session.config.suggestions.limit)
        .with_dry_run(options.dry_run);
    let mut processor = FileProcessor::new(engine, options.processor_options(&session.config));
    let report = processor.run(session, &files)?;

    if !options.quiet {
        output::summary(&report);
    }
    Ok(report)
}

/// Menu offered in training: the configured one unless `basic` is forced.
pub fn menu_kind(config: &Config, basic: bool) -> MenuKind {
    if basic || !config.train.extended_menu {
        MenuKind::Basic
    } else {
        MenuKind::Extended
    }
}

/// `train`: ask the operator about every flagged word on the terminal.
pub fn run_train(config: Config, path: &Path, basic: bool, options: &RunOptions) -> Result<RunReport> {
    let menu = menu_kind(&config, basic);
    let mut session = Session::open(config)?;
    let strategy = Strategy::Interactive {
        menu,
        prompter: Box::new(TerminalPrompter::stdin()),
    };
    run_mode(&mut session, path, strategy, options)
}

/// `correct`: apply the top-ranked suggestion everywhere.
pub fn run_correct(config: Config, path: &Path, options: &RunOptions) -> Result<RunReport> {
    let mut session = Session::open(config)?;
    run_mode(&mut session, path, Strategy::Automatic, options)
}

/// `unsquish`: split squished words, falling back as configured.
pub fn run_unsquish(
    config: Config,
    path: &Path,
    fallback: Fallback,
    options: &RunOptions,
) -> Result<RunReport> {
    let mut session = Session::open(config)?;
    run_mode(&mut session, path, Strategy::Desquish { fallback }, options)
}

/// `prepare`: clean raw OCR text into `output_dir`.
pub fn run_prepare(config: &Config, path: &Path, output_dir: &Path, quiet: bool) -> Result<PrepareReport> {
    let files = discover_files(path)?;
    let dictionary = SymSpellDictionary::open(&config.dictionary)?;
    let options = PrepareOptions {
        ascii_only: config.prepare.ascii_only,
    };
    prepare_files(&files, output_dir, &dictionary, &options, quiet)
}

/// `reset`: delete every stored correction.
///
/// Asks first unless `yes`. Returns the number of deleted records, or
/// `None` if the operator declined.
pub fn run_reset(config: &Config, yes: bool, prompter: &mut dyn Prompter) -> Result<Option<u64>> {
    let history = CorrectionHistory::open(&config.history.db_file)?;
    let records = history.len()?;
    if !yes {
        let question = format!(
            "Delete all {records} stored corrections from {}?",
            config.history.db_file.display()
        );
        if !prompter.confirm(&question, false)? {
            tracing::info!("reset declined");
            return Ok(None);
        }
    }
    let deleted = history.reset()?;
    tracing::info!(deleted, "correction history reset");
    Ok(Some(deleted))
}

/// `stats`: summary numbers of the correction history.
pub fn run_stats(config: &Config) -> Result<HistoryStats> {
    CorrectionHistory::open(&config.history.db_file)?.stats()
}
