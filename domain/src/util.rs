//! Text helpers for log lines and console previews.

use std::borrow::Cow;

const ELLIPSIS: char = '…';

/// First `max_chars` characters of `text` on a single line.
///
/// Newlines become spaces. An `…` marks a cut, and the marker counts
/// toward `max_chars`.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    let single_line = !text.contains(['\n', '\r']);
    if single_line && text.chars().count() <= max_chars {
        return Cow::Borrowed(text);
    }

    let flat = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
    if flat.chars().count() <= max_chars {
        return Cow::Owned(flat);
    }

    let mut cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    Cow::Owned(cut)
}
