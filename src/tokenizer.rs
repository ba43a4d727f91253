//! Tokenization and error-candidate filtering.
//!
//! Tokens keep their raw text and byte offset in the original document so
//! that corrections can be patched back exactly where they were found. The
//! trimmed form is only used for dictionary lookups.

use crate::defaults::PUNCT_TRIM;
use regex::Regex;
use std::sync::LazyLock;

/// Letters each followed by a period: `U.S.A`, `e.g`, `i.e`.
/// The final period is usually gone after trimming.
#[allow(clippy::expect_used)]
static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\p{L}\.)+\p{L}?$").expect("hardcoded acronym pattern"));

/// Numbers, verse references and ordinals: `12`, `1,000`, `3:16`, `12-14`, `1st`.
#[allow(clippy::expect_used)]
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{N}+(?:[:.,\-/]\p{N}+)*(?:st|nd|rd|th|s)?$").expect("hardcoded numeric pattern")
});

/// A whitespace-delimited unit of text with its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw token text, punctuation included.
    pub text: String,
    /// Byte offset of `text` in the tokenized content.
    pub start_offset: usize,
    /// Position of the token in the token sequence.
    pub sequence_index: usize,
}

impl Token {
    /// Byte offset one past the end of the raw token.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.text.len()
    }

    /// The lookup form of the token: surrounding punctuation removed.
    pub fn trimmed(&self) -> &str {
        trim_word(&self.text)
    }
}

/// Split `content` into tokens on whitespace and control characters.
///
/// Pure function of its input; offsets always refer to `content` itself.
pub fn tokenize(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, ch) in content.char_indices() {
        let separator = ch.is_whitespace() || ch.is_control();
        match (separator, start) {
            (true, Some(s)) => {
                push_token(&mut tokens, content, s, idx);
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        push_token(&mut tokens, content, s, content.len());
    }

    tokens
}

fn push_token(tokens: &mut Vec<Token>, content: &str, start: usize, end: usize) {
    let sequence_index = tokens.len();
    tokens.push(Token {
        text: content[start..end].to_string(),
        start_offset: start,
        sequence_index,
    });
}

/// Strip the fixed punctuation set from both ends of a word.
pub fn trim_word(word: &str) -> &str {
    word.trim_matches(PUNCT_TRIM)
}

/// Whether a trimmed word must never be flagged as an error.
///
/// Empty words, words without any letter, acronyms, numbers/verse references
/// and URLs are excluded regardless of what the dictionary says.
pub fn is_excluded(word: &str) -> bool {
    word.is_empty()
        || !word.chars().any(char::is_alphabetic)
        || ACRONYM.is_match(word)
        || NUMERIC.is_match(word)
        || is_url(word)
}

/// URL check: must parse and carry a host (`mailto:` addresses excepted),
/// so `note:that` style OCR joins are not mistaken for URLs.
pub fn is_url(word: &str) -> bool {
    match url::Url::parse(word) {
        Ok(url) => url.has_host() || url.scheme() == "mailto",
        Err(_) => false,
    }
}

/// Neighbouring tokens around `index`, joined by single spaces, with the
/// target's trimmed word wrapped in brackets.
///
/// This is the context stored alongside each recorded correction.
pub fn context_window(tokens: &[Token], index: usize, radius: usize) -> String {
    let Some(target) = tokens.get(index) else {
        return String::new();
    };
    let from = index.saturating_sub(radius);
    let to = (index + radius + 1).min(tokens.len());

    let mut parts: Vec<String> = Vec::with_capacity(to - from);
    for token in &tokens[from..index] {
        parts.push(token.text.clone());
    }
    parts.push(bracket_word(&target.text, target.trimmed()));
    for token in &tokens[index + 1..to] {
        parts.push(token.text.clone());
    }
    parts.join(" ")
}

fn bracket_word(raw: &str, word: &str) -> String {
    if word.is_empty() {
        return raw.to_string();
    }
    match raw.find(word) {
        Some(pos) => format!(
            "{}[{}]{}",
            &raw[..pos],
            word,
            &raw[pos + word.len()..]
        ),
        None => format!("[{raw}]"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn tokenize_splits_on_whitespace_runs_and_keeps_punctuation() {
        let tokens = tokenize("Teh  qick\tbrown\n\nfox.");
        assert_eq!(texts(&tokens), vec!["Teh", "qick", "brown", "fox."]);
    }

    #[test]
    fn tokenize_records_byte_offsets_into_original() {
        let content = "  «Hé» said\u{7}the fox";
        let tokens = tokenize(content);
        for token in &tokens {
            assert_eq!(&content[token.start_offset..token.end_offset()], token.text);
        }
        assert_eq!(texts(&tokens), vec!["«Hé»", "said", "the", "fox"]);
    }

    #[test]
    fn tokenize_sequence_indices_are_positions() {
        let tokens = tokenize("a b c");
        let indices: Vec<usize> = tokens.iter().map(|t| t.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn tokenize_empty_and_blank_content() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn tokenize_is_idempotent_on_rejoined_tokens() {
        let content = "The  \"firft\" Epiftle,\r\nof  PAVL (to the) Galathians!";
        let first = tokenize(content);
        let rejoined = texts(&first).join(" ");
        let second = tokenize(&rejoined);
        assert_eq!(texts(&first), texts(&second));
    }

    #[test]
    fn trim_word_strips_fixed_punctuation_set() {
        assert_eq!(trim_word("\"(fox).\""), "fox");
        assert_eq!(trim_word("-well-known-"), "well-known");
        assert_eq!(trim_word("[*?!{}]"), "");
        assert_eq!(trim_word("don't"), "don't");
    }

    #[test]
    fn excluded_acronyms() {
        assert!(is_excluded("U.S.A"));
        assert!(is_excluded("e.g"));
        assert!(is_excluded("i.e"));
        assert!(!is_excluded("Englifh"));
    }

    #[test]
    fn excluded_numbers_and_verse_references() {
        for word in ["12", "1,000", "3:16", "12-14", "1st", "1560s", "2/3"] {
            assert!(is_excluded(word), "{word} should be excluded");
        }
    }

    #[test]
    fn excluded_urls_but_not_colon_joins() {
        assert!(is_excluded("https://example.org/page"));
        assert!(is_excluded("mailto:someone@example.org"));
        assert!(!is_excluded("note:that"));
    }

    #[test]
    fn excluded_words_without_letters() {
        assert!(is_excluded(""));
        assert!(is_excluded("§"));
        assert!(is_excluded("&"));
        assert!(!is_excluded("ofFiith"));
    }

    #[test]
    fn context_window_brackets_target_word() {
        let tokens = tokenize("one two three \"teh\" four five six");
        let ctx = context_window(&tokens, 3, 2);
        assert_eq!(ctx, "two three \"[teh]\" four five");
    }

    #[test]
    fn context_window_clamps_at_document_edges() {
        let tokens = tokenize("teh end");
        assert_eq!(context_window(&tokens, 0, 5), "[teh] end");
        assert_eq!(context_window(&tokens, 9, 5), "");
    }

    #[test]
    fn token_trimmed_and_end_offset() {
        let tokens = tokenize("x (qick),");
        assert_eq!(tokens[1].trimmed(), "qick");
        assert_eq!(tokens[1].end_offset(), 9);
    }
}
