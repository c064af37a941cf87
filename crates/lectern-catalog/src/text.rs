//! Display helpers for catalog text.

/// Keep the first `word_count` space-separated words of a description.
///
/// An ellipsis is appended only when something was cut off.
pub fn trim_description(description: &str, word_count: usize) -> String {
    let trimmed = description
        .split(' ')
        .take(word_count)
        .collect::<Vec<_>>()
        .join(" ");
    if trimmed.len() < description.len() {
        format!("{}...", trimmed)
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_long_description() {
        assert_eq!(
            trim_description("the quick brown fox jumps", 3),
            "the quick brown..."
        );
    }

    #[test]
    fn test_short_description_untouched() {
        assert_eq!(trim_description("two words", 5), "two words");
        assert_eq!(trim_description("", 5), "");
    }
}
