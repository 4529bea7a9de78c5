//! Post text helpers.

/// Default platform length limit, in characters.
pub const DEFAULT_MAX_POST_CHARS: usize = 200;

/// Truncate `text` to at most `limit` characters.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
/// The result is always a prefix of the input.
///
/// # Examples
///
/// ```
/// use larkpost_core::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("short", 200), "short");
/// ```
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_long_text_to_limit() {
        let original: String = "abcdefghij".repeat(35);
        assert_eq!(original.chars().count(), 350);

        let truncated = truncate_chars(&original, 200);
        assert_eq!(truncated.chars().count(), 200);
        assert!(original.starts_with(truncated));
    }

    #[test]
    fn test_truncate_exact_length_is_unchanged() {
        let text = "x".repeat(200);
        assert_eq!(truncate_chars(&text, 200), text);
    }

    #[test]
    fn test_truncate_multibyte() {
        let text = "🦀".repeat(250);
        let truncated = truncate_chars(&text, 200);
        assert_eq!(truncated.chars().count(), 200);
        assert_eq!(truncated.len(), 200 * '🦀'.len_utf8());
    }

    #[test]
    fn test_truncate_zero() {
        assert_eq!(truncate_chars("anything", 0), "");
    }
}
