//! In-place text patching anchored on word boundaries.
//!
//! A replacement must never land inside a longer word: correcting `teh`
//! leaves `teheran` alone. The boundary rule only applies to edges of the
//! error that are themselves alphanumeric, so errors carrying punctuation
//! (`"teh,"`) still match next to letters.

/// How many occurrences `apply` replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchMode {
    #[default]
    First,
    All,
}

/// Result of a patch; `replaced == 0` means the error was not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub content: String,
    pub replaced: usize,
}

impl Patch {
    pub fn applied(&self) -> bool {
        self.replaced > 0
    }
}

/// Replace anchored occurrences of `error` in `content`.
pub fn apply(content: &str, error: &str, correction: &str, mode: PatchMode) -> Patch {
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut replaced = 0;

    while let Some(at) = find_anchored(content, error, cursor) {
        out.push_str(&content[cursor..at]);
        out.push_str(correction);
        cursor = at + error.len();
        replaced += 1;
        if mode == PatchMode::First {
            break;
        }
    }
    out.push_str(&content[cursor..]);

    Patch {
        content: out,
        replaced,
    }
}

/// Replace the first anchored occurrence of `error` at or after byte `from`.
///
/// Returns the patched content and the offset where the correction was
/// written, or `None` when there is no such occurrence. Text before `from`
/// is never touched.
pub fn apply_from(
    content: &str,
    error: &str,
    correction: &str,
    from: usize,
) -> Option<(String, usize)> {
    let at = find_anchored(content, error, from)?;
    let mut out = String::with_capacity(content.len() + correction.len());
    out.push_str(&content[..at]);
    out.push_str(correction);
    out.push_str(&content[at + error.len()..]);
    Some((out, at))
}

/// Byte offset of the first anchored occurrence of `needle` at or after `from`.
pub fn find_anchored(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() || !haystack.is_char_boundary(from) {
        return None;
    }
    let first_is_word = needle.chars().next().is_some_and(char::is_alphanumeric);
    let last_is_word = needle.chars().next_back().is_some_and(char::is_alphanumeric);

    let mut search = from;
    while let Some(pos) = haystack[search..].find(needle) {
        let at = search + pos;
        let end = at + needle.len();
        let before_ok =
            !first_is_word || !haystack[..at].chars().next_back().is_some_and(char::is_alphanumeric);
        let after_ok =
            !last_is_word || !haystack[end..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return Some(at);
        }
        // Step one char forward to keep the search on char boundaries
        search = at + haystack[at..].chars().next().map_or(1, char::len_utf8);
    }
    None
}
