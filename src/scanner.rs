// Word-boundary scanning for abbreviation candidates.
// Extracted semantics: a fixed terminator set ends a word, except that an
// apostrophe inside a word (possessives, contractions) does not.

/// Characters that end a word and can trigger an expansion.
pub const WORD_TERMINATORS: &[char] = &[
    ' ', '\r', '\n', '\t', ',', '.', '-', '!', '?', '\'', '"',
];

/// True iff `ch` is in the fixed word-terminator set.
pub fn is_word_terminator(ch: char) -> bool {
    WORD_TERMINATORS.contains(&ch)
}

/// Finds the longest run of non-terminator characters immediately before
/// `before_pos` (a byte offset on a char boundary, exclusive).
///
/// A single quote is normally a terminator, but when the character before it
/// is itself not a terminator the quote is inside a word ("that's") and the
/// scan continues leftward through it; a quote at a true boundary ("'cat")
/// still ends the scan. Returns `None` only when `before_pos` is 0; a
/// terminator directly before `before_pos` yields an empty token.
pub fn find_possible_abbreviation(text: &str, before_pos: usize) -> Option<&str> {
    if before_pos == 0 {
        return None;
    }
    let head = &text[..before_pos];
    let mut start = 0;
    for (idx, ch) in head.char_indices().rev() {
        if !is_word_terminator(ch) {
            continue;
        }
        if ch == '\'' {
            let prev = head[..idx].chars().next_back();
            if let Some(prev) = prev {
                if !is_word_terminator(prev) {
                    // Apostrophe inside a word; keep scanning left.
                    continue;
                }
            }
        }
        start = idx + ch.len_utf8();
        break;
    }
    Some(&head[start..])
}
