//! Operator interaction seam.
//!
//! The engine only talks to a `Prompter`; the terminal is one
//! implementation, a scripted queue of answers is another.

use crate::decision::menu::{Choice, Menu};
use crate::error::{OcrfixError, Result};
use crate::output;
use std::collections::VecDeque;
use std::io::{self, BufRead};

pub trait Prompter {
    /// Show `menu` and block until a valid choice is made.
    fn choose(&mut self, menu: &Menu) -> Result<Choice>;

    /// Free-text question.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Yes/no question; empty input answers `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
}

fn closed() -> OcrfixError {
    OcrfixError::Prompt {
        message: "input closed".to_string(),
    }
}

fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Line-based prompter over any reader; stdin by default.
pub struct TerminalPrompter<R: BufRead> {
    reader: R,
}

impl TerminalPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            reader: io::stdin().lock(),
        }
    }
}

impl<R: BufRead> TerminalPrompter<R> {
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line)?;
        if n == 0 {
            return Err(closed());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl<R: BufRead> Prompter for TerminalPrompter<R> {
    fn choose(&mut self, menu: &Menu) -> Result<Choice> {
        loop {
            output::render_menu(menu);
            let line = self.read_line()?;
            match menu.parse(&line) {
                Some(choice) => return Ok(choice),
                None => output::invalid_choice(&line),
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        output::question(question);
        self.read_line()
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        loop {
            output::question(&format!(
                "{question} [{}]",
                if default { "Y/n" } else { "y/N" }
            ));
            let line = self.read_line()?;
            if let Some(answer) = parse_yes_no(&line, default) {
                return Ok(answer);
            }
            output::invalid_choice(&line);
        }
    }
}

/// Prompter answering from a fixed script, one line per question.
///
/// Unparseable menu answers are consumed and the menu is "shown" again,
/// the same as a terminal re-prompt. Running out of answers is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    menus_shown: usize,
    questions: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// How many times a menu was presented, re-prompts included.
    pub fn menus_shown(&self) -> usize {
        self.menus_shown
    }

    /// Free-text and confirmation questions asked so far.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self) -> Result<String> {
        self.answers.pop_front().ok_or_else(|| OcrfixError::Prompt {
            message: "scripted answers exhausted".to_string(),
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn choose(&mut self, menu: &Menu) -> Result<Choice> {
        loop {
            self.menus_shown += 1;
            let answer = self.next()?;
            if let Some(choice) = menu.parse(&answer) {
                return Ok(choice);
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        self.next()
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.questions.push(question.to_string());
        loop {
            let answer = self.next()?;
            if let Some(yes) = parse_yes_no(&answer, default) {
                return Ok(yes);
            }
        }
    }
}
