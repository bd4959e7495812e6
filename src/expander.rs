// Expansion pipeline: terminator keystroke -> candidate token -> resolver
// lookup -> case-rendered splice -> substitution edit. The core computes
// the edit; the host text view applies it.

use std::ops::Range;

use crate::casing::render_expansion;
use crate::resolver::AbbrevResolver;
use crate::scanner::{find_possible_abbreviation, is_word_terminator};

/// A single substitution for the host to apply: replace the byte `range`
/// of the buffer with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Decides what should happen when `ch` is typed with the caret at byte
/// position `pos` in `text` (the buffer content *before* the keystroke).
///
/// Returns an edit only when `ch` is a word terminator, the token ending at
/// `pos` is non-empty, and the token resolves unambiguously; the edit's
/// range spans exactly the trigger token. The typed character itself is not
/// part of the edit; the host inserts it as usual after substituting.
pub fn edit_for_typed_char(
    resolver: &AbbrevResolver,
    text: &str,
    pos: usize,
    ch: char,
) -> Option<ExpansionEdit> {
    if !is_word_terminator(ch) {
        return None;
    }
    let token = find_possible_abbreviation(text, pos)?;
    if token.is_empty() {
        return None;
    }
    let raw = resolver.get_expansion(token)?;
    let replacement = render_expansion(&raw, token);
    Some(ExpansionEdit {
        range: pos - token.len()..pos,
        replacement,
    })
}

/// Expands every abbreviation in `text` that is followed by a word
/// terminator, as if the document had been typed through
/// [`edit_for_typed_char`]. A trailing token with no terminator after it is
/// left alone, matching the interactive behavior.
pub fn expand_text(resolver: &AbbrevResolver, text: &str) -> String {
    let mut edits = Vec::new();
    for (pos, ch) in text.char_indices() {
        if let Some(edit) = edit_for_typed_char(resolver, text, pos, ch) {
            edits.push(edit);
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    for edit in edits {
        out.push_str(&text[copied_to..edit.range.start]);
        out.push_str(&edit.replacement);
        copied_to = edit.range.end;
    }
    out.push_str(&text[copied_to..]);
    out
}
