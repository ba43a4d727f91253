//! Noise removal before correction.
//!
//! Raw OCR output is full of layout artifacts: hard line wraps, words split
//! across lines, page numbers, runs of blanks, stray symbols. Cleaning them
//! first means far fewer false positives once the document is checked.

use crate::error::Result;
use crate::oracle::Dictionary;
use crate::output;
use crate::processor::output_path;
use crate::tokenizer::{Token, tokenize};
use regex::{Captures, Regex};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static NON_ASCII: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F\s]").expect("hardcoded non-ascii pattern"));

#[allow(clippy::expect_used)]
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("hardcoded blank-run pattern"));

#[allow(clippy::expect_used)]
static SPACE_BEFORE_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+([.,;:!?)\]}])").expect("hardcoded punctuation pattern"));

#[allow(clippy::expect_used)]
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("hardcoded entity pattern")
});

#[allow(clippy::expect_used)]
static HYPHEN_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([[:alnum:]]+)-[ \t]?[\r\n]+([[:alnum:]]+)").expect("hardcoded hyphen-break pattern")
});

#[allow(clippy::expect_used)]
static PAGE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n+[\p{P}\p{S} \t]*\p{N}[\p{N}\p{P}\p{S} \t]*\n+").expect("hardcoded page-number pattern")
});

#[allow(clippy::expect_used)]
static EXTRA_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]{3,}").expect("hardcoded line-break pattern"));

/// Trailing punctuation kept after the last real word.
const CLOSING_PUNCT: &[char] = &['.', '!', '?', '"', '\'', ')', ']'];

#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Drop every non-ASCII, non-whitespace character.
    pub ascii_only: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self { ascii_only: true }
    }
}

/// Clean one document. Pure apart from dictionary lookups.
pub fn prepare_content(content: &str, dictionary: &dyn Dictionary, options: &PrepareOptions) -> String {
    let mut text = content.replace("\r\n", "\n");

    if options.ascii_only {
        text = NON_ASCII.replace_all(&text, "").into_owned();
    }
    text = BLANK_RUN.replace_all(&text, " ").into_owned();
    text = SPACE_BEFORE_CLOSING.replace_all(&text, "$1").into_owned();
    text = decode_entities(&text);
    text = HYPHEN_BREAK.replace_all(&text, "$1$2").into_owned();
    text = unwrap_lines(&text);
    text = PAGE_NUMBER.replace_all(&text, "\n\n").into_owned();
    text = EXTRA_BREAKS.replace_all(&text, "\n\n").into_owned();

    trim_to_words(&text, dictionary)
}

/// Decode the handful of HTML entities that show up in scanned exports.
/// Unknown entities are left alone.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            let decoded = if let Some(num) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(num, 16).ok().and_then(char::from_u32)
            } else if let Some(num) = name.strip_prefix('#') {
                num.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match name {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Join hard-wrapped lines: a single line break between two non-blank lines
/// becomes a space. Blank lines (paragraph breaks) survive.
fn unwrap_lines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = String::with_capacity(text.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            let prev_has_text = !lines[idx - 1].trim().is_empty();
            let next_starts_text = line.chars().next().is_some_and(|c| !c.is_whitespace());
            if prev_has_text && next_starts_text {
                let kept = out.trim_end_matches([' ', '\t']).len();
                out.truncate(kept);
                out.push(' ');
            } else {
                out.push('\n');
            }
        }
        out.push_str(line);
    }
    out
}

fn is_real_word(token: &Token, dictionary: &dyn Dictionary) -> bool {
    let word = token.trimmed();
    word.chars().count() >= 2 && dictionary.check(word)
}

/// Byte offset where the first real word starts: trimmed form at least two
/// characters long and known to the dictionary.
pub fn first_valid_word_offset(content: &str, dictionary: &dyn Dictionary) -> Option<usize> {
    tokenize(content)
        .iter()
        .find(|t| is_real_word(t, dictionary))
        .map(|t| word_start(t))
}

/// Byte offset just past the last real word, including closing punctuation
/// directly attached to it.
pub fn last_valid_word_offset(content: &str, dictionary: &dyn Dictionary) -> Option<usize> {
    let tokens = tokenize(content);
    let token = tokens.iter().rev().find(|t| is_real_word(t, dictionary))?;
    let end = word_start(token) + token.trimmed().len();
    let tail = &content[end..token.end_offset()];
    let closing: usize = tail
        .chars()
        .take_while(|c| CLOSING_PUNCT.contains(c))
        .map(char::len_utf8)
        .sum();
    Some(end + closing)
}

fn word_start(token: &Token) -> usize {
    let word = token.trimmed();
    let lead = token.text.find(word).unwrap_or(0);
    token.start_offset + lead
}

/// Cut leading and trailing gobbledygook. No real word at all leaves nothing.
fn trim_to_words(content: &str, dictionary: &dyn Dictionary) -> String {
    match (
        first_valid_word_offset(content, dictionary),
        last_valid_word_offset(content, dictionary),
    ) {
        (Some(start), Some(end)) if start < end => content[start..end].to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PrepareReport {
    pub prepared: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Prepare every file into `output_dir`. Per-file failures are reported
/// and the rest continue.
pub fn prepare_files(
    files: &[PathBuf],
    output_dir: &Path,
    dictionary: &dyn Dictionary,
    options: &PrepareOptions,
    quiet: bool,
) -> Result<PrepareReport> {
    fs::create_dir_all(output_dir)?;
    if !quiet {
        output::title(&format!("Preparing {} files ...", files.len()));
    }

    let mut report = PrepareReport::default();
    for file in files {
        let target = output_path(file, Some(output_dir));
        let result = fs::read_to_string(file)
            .and_then(|content| fs::write(&target, prepare_content(&content, dictionary, options)));
        match result {
            Ok(()) => {
                if !quiet {
                    output::file_status(&file.display().to_string(), true);
                }
                report.prepared.push(target);
            }
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "failed to prepare file");
                if !quiet {
                    output::file_status(&file.display().to_string(), false);
                }
                report.failed.push((file.clone(), e.to_string()));
            }
        }
    }
    tracing::info!(
        prepared = report.prepared.len(),
        failed = report.failed.len(),
        "prepare finished"
    );
    Ok(report)
}
