//! Operator-facing terminal output.
//! Titles, flagged-word context, menus and per-correction results all go to
//! stderr so stdout stays clean for `--json` reports.

use crate::decision::menu::Menu;
use crate::processor::RunReport;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const HIGHLIGHT: &str = "\x1b[97;41m";
const RESET: &str = "\x1b[0m";

/// Document or run title.
pub fn title(text: &str) {
    eprintln!();
    eprintln!("{BOLD}{text}{RESET}");
    eprintln!("{BOLD}{}{RESET}", "=".repeat(text.chars().count().min(80)));
}

/// Header for one flagged word.
pub fn section(word: &str) {
    eprintln!();
    eprintln!("{YELLOW}{word}{RESET}");
    eprintln!("{YELLOW}{}{RESET}", "-".repeat(word.chars().count().clamp(1, 80)));
}

/// Highlight the bracketed word of a stored context string.
pub fn format_context(context: &str) -> String {
    match (context.find('['), context.rfind(']')) {
        (Some(open), Some(close)) if open < close => format!(
            "{}{HIGHLIGHT}{}{RESET}{}",
            &context[..open],
            &context[open + 1..close],
            &context[close + 1..]
        ),
        _ => context.to_string(),
    }
}

pub fn context(context: &str) {
    eprintln!("{}", format_context(context));
}

/// Menu lines: actions first, then numbered suggestions.
pub fn format_menu(menu: &Menu) -> Vec<String> {
    menu.entries()
        .into_iter()
        .map(|(key, label)| format!("  [{GREEN}{key}{RESET}] {label}"))
        .collect()
}

pub fn render_menu(menu: &Menu) {
    eprintln!("What do you want to do with this possible error? {DIM}[s]{RESET}");
    for line in format_menu(menu) {
        eprintln!("{line}");
    }
    eprint!(" > ");
}

pub fn invalid_choice(input: &str) {
    eprintln!("{RED}Value \"{}\" is invalid{RESET}", input.trim());
}

pub fn question(text: &str) {
    eprintln!("{text}");
    eprint!(" > ");
}

/// Dimmed one-line remark.
pub fn note(text: &str) {
    eprintln!("{DIM}// {text}{RESET}");
}

pub fn skipped() {
    note("Skipped");
}

pub fn error(text: &str) {
    eprintln!("{RED}[ERROR] {text}{RESET}");
}

pub fn replaced(error: &str, correction: &str) {
    eprintln!("Replaced {RED}{error}{RESET} with {GREEN}{correction}{RESET}");
}

pub fn removed(error: &str) {
    eprintln!("Removed {RED}{error}{RESET}");
}

pub fn not_found(error: &str) {
    eprintln!("{YELLOW}Could not find {error} where it was flagged; left unchanged{RESET}");
}

/// `name ... OK` / `name ... ERROR` line for batch operations.
pub fn file_status(name: &str, ok: bool) {
    if ok {
        eprintln!("{name} ... {GREEN}OK{RESET}");
    } else {
        eprintln!("{name} ... {RED}ERROR{RESET}");
    }
}

/// Plain-text run summary.
pub fn format_summary(report: &RunReport) -> String {
    let t = &report.totals;
    let mut summary = format!(
        "{} file(s): {} flagged, {} replaced, {} removed, {} kept, {} skipped",
        report.files.len(),
        t.flagged,
        t.replaced,
        t.removed,
        t.kept,
        t.skipped
    );
    if t.missing > 0 {
        summary.push_str(&format!(", {} not found", t.missing));
    }
    let failed = report.files.iter().filter(|f| f.error.is_some()).count();
    if failed > 0 {
        summary.push_str(&format!(", {failed} file error(s)"));
    }
    if report.quit {
        summary.push_str(" (quit early)");
    }
    summary
}

pub fn summary(report: &RunReport) {
    eprintln!();
    eprintln!("{GREEN}{}{RESET}", format_summary(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::menu::MenuKind;
    use crate::processor::{DocumentReport, FileReport};
    use std::path::PathBuf;

    #[test]
    fn format_context_highlights_bracketed_word() {
        let got = format_context("the [qick] brown");
        assert_eq!(got, format!("the {HIGHLIGHT}qick{RESET} brown"));
    }

    #[test]
    fn format_context_without_brackets_is_unchanged() {
        assert_eq!(format_context("plain text"), "plain text");
        assert_eq!(format_context("odd ] order ["), "odd ] order [");
    }

    #[test]
    fn format_menu_lists_every_entry() {
        let menu = Menu::new(MenuKind::Basic, vec!["quick".into(), "quack".into()]);
        let lines = format_menu(&menu);
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("Skip"));
        assert!(lines[7].contains("quack"));
        assert!(lines[7].contains('2'));
    }

    #[test]
    fn format_summary_mentions_quit_and_failures() {
        let report = RunReport {
            files: vec![
                FileReport {
                    path: PathBuf::from("a.txt"),
                    report: DocumentReport {
                        flagged: 3,
                        replaced: 2,
                        skipped: 1,
                        ..DocumentReport::default()
                    },
                    written_to: None,
                    error: None,
                },
                FileReport {
                    path: PathBuf::from("b.txt"),
                    report: DocumentReport::default(),
                    written_to: None,
                    error: Some("permission denied".into()),
                },
            ],
            totals: DocumentReport {
                flagged: 3,
                replaced: 2,
                skipped: 1,
                ..DocumentReport::default()
            },
            quit: true,
        };
        let summary = format_summary(&report);
        assert!(summary.starts_with("2 file(s): 3 flagged, 2 replaced"));
        assert!(summary.contains("1 file error(s)"));
        assert!(summary.ends_with("(quit early)"));
    }
}
