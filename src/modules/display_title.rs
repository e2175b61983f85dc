// Pure title derivation - no host access.

/// Longest title we ever write to the tab, ellipsis included.
/// Counted in `char`s (Unicode scalar values), not UTF-16 code units.
pub const MAX_TITLE_CHARS: usize = 50;

/// Marker appended to truncated titles.
pub const ELLIPSIS: &str = "...";

const KEEP_CHARS: usize = MAX_TITLE_CHARS - 3;

/// Derive the tab title from the raw text of the title element.
///
/// Whitespace is trimmed first. Anything longer than
/// [`MAX_TITLE_CHARS`] keeps its first 47 characters followed by
/// [`ELLIPSIS`]; shorter text is returned as-is. Lengths count Unicode
/// scalar values, so multi-byte characters are never split.
pub fn compute_display_title(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    if trimmed.chars().count() <= MAX_TITLE_CHARS {
        return trimmed.to_string();
    }

    let mut truncated: String = trimmed.chars().take(KEEP_CHARS).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("   ", "")]
    #[case("Hello", "Hello")]
    #[case("  padded title \n", "padded title")]
    #[case("\tTabs and newlines\n\n", "Tabs and newlines")]
    fn test_short_titles_are_trimmed_only(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(compute_display_title(input), expected);
    }

    #[test]
    fn test_exactly_fifty_chars_is_kept() {
        let input = "a".repeat(50);
        assert_eq!(compute_display_title(&input), input);
    }

    #[test]
    fn test_fifty_one_chars_is_truncated_to_fifty() {
        let input = "b".repeat(51);
        let out = compute_display_title(&input);
        assert_eq!(out.chars().count(), 50);
        assert_eq!(out, format!("{}...", "b".repeat(47)));
    }

    #[test]
    fn test_surrounding_whitespace_does_not_count() {
        let input = format!("   {}   ", "c".repeat(50));
        assert_eq!(compute_display_title(&input), "c".repeat(50));
    }

    #[test]
    fn test_conversation_title_scenario() {
        let out = compute_display_title("  Explaining quantum entanglement in simple terms today  ");
        assert_eq!(out, "Explaining quantum entanglement in simple terms...");
        assert_eq!(out.chars().count(), 50);
    }

    #[test]
    fn test_length_property_over_range() {
        for len in 0..120 {
            let input = format!(" {} ", "x".repeat(len));
            let out = compute_display_title(&input);
            if len <= MAX_TITLE_CHARS {
                assert_eq!(out, "x".repeat(len));
            } else {
                assert_eq!(out.chars().count(), MAX_TITLE_CHARS);
                assert!(out.ends_with(ELLIPSIS));
                assert_eq!(&out[..47], &"x".repeat(len)[..47]);
            }
        }
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let input = "é".repeat(60);
        let out = compute_display_title(&input);
        assert_eq!(out.chars().count(), 50);
        assert_eq!(out, format!("{}...", "é".repeat(47)));
    }
}
