//! Document processing: tokenize, flag, decide, patch, write back.
//!
//! Tokens are computed once on the original content. As corrections change
//! the document, the current start of every later token is shifted by the
//! length difference, so each patch lands on the token it was decided for
//! and never on earlier identical text.

use crate::decision::engine::{DecisionEngine, Flagged, Outcome, Resolution};
use crate::defaults;
use crate::error::{OcrfixError, Result};
use crate::oracle::Dictionary;
use crate::output;
use crate::patcher;
use crate::session::Session;
use crate::tokenizer::{Token, context_window, is_excluded, tokenize};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Never write documents back.
    pub dry_run: bool,
    /// Write results here instead of over the input file.
    pub output_dir: Option<PathBuf>,
    /// Leave hyphenated compounds of valid words alone.
    pub skip_hyphenated: bool,
    pub context_radius: usize,
    pub quiet: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            output_dir: None,
            skip_hyphenated: false,
            context_radius: defaults::CONTEXT_RADIUS,
            quiet: false,
        }
    }
}

/// Per-document tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub flagged: usize,
    pub replaced: usize,
    pub removed: usize,
    pub kept: usize,
    pub skipped: usize,
    /// Decided, but the error text was no longer where the token was.
    pub missing: usize,
}

impl DocumentReport {
    pub fn merge(&mut self, other: &DocumentReport) {
        self.flagged += other.flagged;
        self.replaced += other.replaced;
        self.removed += other.removed;
        self.kept += other.kept;
        self.skipped += other.skipped;
        self.missing += other.missing;
    }

    pub fn changes(&self) -> usize {
        self.replaced + self.removed
    }
}

#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    pub content: String,
    pub report: DocumentReport,
    /// The operator quit while this document was open.
    pub quit: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub report: DocumentReport,
    /// Where the result went, if anything was written.
    pub written_to: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub totals: DocumentReport,
    pub quit: bool,
}

/// Input documents for `path`: the file itself, or the `*.txt` files of a
/// directory in sorted order.
pub fn discover_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(OcrfixError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("No such file or directory: {}", path.display()),
        )));
    }
    let mut files: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();
    Ok(files)
}

/// Where a processed document is written.
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, input.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => input.to_path_buf(),
    }
}

/// Whether every hyphen-separated part of `word` is itself valid.
fn is_valid_compound(word: &str, dictionary: &dyn Dictionary) -> bool {
    word.contains('-')
        && word
            .split('-')
            .filter(|part| !part.is_empty())
            .all(|part| dictionary.check(part))
}

pub struct FileProcessor {
    engine: DecisionEngine,
    options: ProcessorOptions,
}

impl std::fmt::Debug for FileProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileProcessor")
            .field("engine", &self.engine)
            .field("options", &self.options)
            .finish()
    }
}

impl FileProcessor {
    pub fn new(engine: DecisionEngine, options: ProcessorOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    /// Whether a trimmed word is an error candidate.
    pub fn is_flagged(&self, word: &str, dictionary: &dyn Dictionary) -> bool {
        !is_excluded(word)
            && !dictionary.check(word)
            && !(self.options.skip_hyphenated && is_valid_compound(word, dictionary))
    }

    /// Run every flagged token of `content` through the engine, left to right.
    pub fn process_content(
        &mut self,
        session: &mut Session,
        content: &str,
        source: &str,
    ) -> Result<DocumentOutcome> {
        let tokens = tokenize(content);
        let mut current = content.to_string();
        let mut starts: Vec<usize> = tokens.iter().map(|t| t.start_offset).collect();
        // Tokens swallowed by an expanded-context replacement
        let mut consumed = vec![false; tokens.len()];
        let mut report = DocumentReport::default();
        let mut quit = false;

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let word = token.trimmed();
            if !self.is_flagged(word, session.dictionary.as_ref()) {
                i += 1;
                continue;
            }
            report.flagged += 1;

            let context = context_window(&tokens, i, self.options.context_radius);
            let (span_start, span_end) = expanded_span(&tokens, &starts, &consumed, i);
            let expanded = current[span_start..span_end].to_string();
            if !self.options.quiet {
                output::section(word);
                output::context(&context);
            }

            let flagged = Flagged {
                word,
                context: &context,
                expanded: &expanded,
                source,
            };
            let outcome = self.engine.decide(session, &flagged)?;

            let mut advance = 1;
            match &outcome {
                Outcome::Quit => {
                    quit = true;
                    break;
                }
                Outcome::Skipped => report.skipped += 1,
                Outcome::AutoApplied(resolution) | Outcome::ManualResolved(resolution) => {
                    let (from, limit) = if resolution.fast_forward {
                        advance = 2;
                        (span_start, span_start)
                    } else {
                        let slack = token.text.len().saturating_sub(resolution.error.len());
                        (starts[i], starts[i] + slack)
                    };
                    let patched =
                        self.apply(&mut current, &mut starts, resolution, from, limit, &mut report);
                    if patched && resolution.fast_forward {
                        for flag in consumed.iter_mut().skip(i).take(2) {
                            *flag = true;
                        }
                    }
                }
            }
            i += advance;
        }

        tracing::info!(
            source,
            flagged = report.flagged,
            replaced = report.replaced,
            removed = report.removed,
            quit,
            "document processed"
        );
        Ok(DocumentOutcome {
            content: current,
            report,
            quit,
        })
    }

    /// Patch one resolution into `current`, accepting a match only between
    /// `from` and `limit` so it stays on the decided token. Returns whether
    /// the content changed.
    fn apply(
        &self,
        current: &mut String,
        starts: &mut [usize],
        resolution: &Resolution,
        from: usize,
        limit: usize,
        report: &mut DocumentReport,
    ) -> bool {
        if resolution.is_unchanged() {
            report.kept += 1;
            return false;
        }

        let patched = patcher::apply_from(current, &resolution.error, &resolution.correction, from)
            .filter(|(_, at)| *at <= limit);
        let Some((content, at)) = patched else {
            report.missing += 1;
            tracing::warn!(error = %resolution.error, "correction target not found");
            if !self.options.quiet {
                output::not_found(&resolution.error);
            }
            return false;
        };

        let delta = resolution.correction.len() as isize - resolution.error.len() as isize;
        for start in starts.iter_mut().filter(|s| **s > at) {
            *start = start.saturating_add_signed(delta);
        }
        *current = content;

        if resolution.is_removal() {
            report.removed += 1;
            if !self.options.quiet {
                output::removed(&resolution.error);
            }
        } else {
            report.replaced += 1;
            if !self.options.quiet {
                output::replaced(&resolution.error, &resolution.correction);
            }
        }
        true
    }

    /// Process one file and write the result back (or to the output directory).
    ///
    /// Write failures are reported in the returned `FileReport`, not as errors.
    pub fn process_file(&mut self, session: &mut Session, path: &Path) -> Result<(FileReport, bool)> {
        let content = fs::read_to_string(path)?;
        if !self.options.quiet {
            output::title(&path.display().to_string());
        }
        let source = path.display().to_string();
        let outcome = self.process_content(session, &content, &source)?;

        let mut file_report = FileReport {
            path: path.to_path_buf(),
            report: outcome.report,
            written_to: None,
            error: None,
        };

        let target = output_path(path, self.options.output_dir.as_deref());
        let changed = outcome.content != content;
        if !self.options.dry_run && (changed || target != path) {
            match write_document(&target, &outcome.content) {
                Ok(()) => file_report.written_to = Some(target),
                Err(e) => {
                    tracing::warn!(path = %target.display(), error = %e, "failed to write document");
                    output::error(&format!("Error writing to {}", target.display()));
                    file_report.error = Some(e.to_string());
                }
            }
        }

        Ok((file_report, outcome.quit))
    }

    /// Process every document under `paths` until done or the operator quits.
    ///
    /// Unreadable or unwritable files are reported and skipped; storage and
    /// prompt failures abort the run.
    pub fn run(&mut self, session: &mut Session, paths: &[PathBuf]) -> Result<RunReport> {
        let mut run = RunReport::default();
        for path in paths {
            let (file_report, quit) = match self.process_file(session, path) {
                Ok(result) => result,
                Err(OcrfixError::Io(e)) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to read document");
                    output::error(&format!("Error reading {}: {e}", path.display()));
                    run.files.push(FileReport {
                        path: path.clone(),
                        report: DocumentReport::default(),
                        written_to: None,
                        error: Some(e.to_string()),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };
            run.totals.merge(&file_report.report);
            run.files.push(file_report);
            if quit {
                run.quit = true;
                break;
            }
        }
        Ok(run)
    }
}

/// Byte range of the previous token's start through the next token's end,
/// in current-content coordinates. A consumed previous token no longer has
/// a start of its own, so the span then begins at the token itself.
fn expanded_span(tokens: &[Token], starts: &[usize], consumed: &[bool], i: usize) -> (usize, usize) {
    let start = if i > 0 && !consumed[i - 1] {
        starts[i - 1]
    } else {
        starts[i]
    };
    let last = if i + 1 < tokens.len() { i + 1 } else { i };
    (start, starts[last] + tokens[last].text.len())
}

fn write_document(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
