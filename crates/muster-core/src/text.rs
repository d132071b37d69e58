//! Char-safe nickname truncation.
//!
//! Notification text shows at most a few characters of a nickname followed by
//! an ellipsis. Nicknames are routinely multi-byte (Hangul, emoji), so the
//! cut must count characters, never bytes.

/// Truncate `s` to at most `max_chars` characters, appending `"..."` when
/// anything was cut. Strings that already fit are returned unchanged.
///
/// Nothing in the orchestrator calls this; it exists for the notification
/// layer, which shortens nicknames when composing toast text from
/// [`crate::events::MusterEvent`] fields.
pub fn truncate_nickname(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_nickname_unchanged() {
        assert_eq!(truncate_nickname("Alice", 5), "Alice");
        assert_eq!(truncate_nickname("", 5), "");
    }

    #[test]
    fn long_nickname_truncated() {
        assert_eq!(truncate_nickname("Alexandria", 5), "Alexa...");
    }

    #[test]
    fn multibyte_counts_chars_not_bytes() {
        // 6 Hangul syllables, 3 bytes each
        assert_eq!(truncate_nickname("가나다라마바", 5), "가나다라마...");
        assert_eq!(truncate_nickname("가나다", 5), "가나다");
    }
}
