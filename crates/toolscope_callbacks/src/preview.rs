//! Log-friendly truncation of tool responses.

use std::borrow::Cow;

/// Truncates `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Cuts on a character boundary, so multi-byte text is never split.
#[must_use]
pub fn truncate_preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed() {
        assert!(matches!(truncate_preview("short", 200), Cow::Borrowed("short")));
    }

    #[test]
    fn exact_length_is_not_cut() {
        assert_eq!(truncate_preview("abcd", 4), "abcd");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        assert_eq!(truncate_preview("abcdef", 3), "abc...");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundary() {
        assert_eq!(truncate_preview("辣子鸡丁好吃", 2), "辣子...");
    }
}
