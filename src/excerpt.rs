//! Produces the short plain-text previews shown for each post on the index
//! page.

/// The default excerpt budget, in `char`s.
pub const DEFAULT_LENGTH: usize = 200;

/// Markdown punctuation that is dropped before extracting the preview text.
/// This is a character filter, not a Markdown parse; escaped or nested
/// syntax gets no special treatment.
const MARKDOWN_PUNCTUATION: &[char] = &['#', '*', '`', '[', ']'];

/// Extracts a plain-text preview from a post body: the first
/// blank-line-delimited paragraph, truncated to `max_length` `char`s at a
/// whitespace boundary with a `...` marker when the paragraph runs long.
pub fn extract(body: &str, max_length: usize) -> String {
    let plain: String = body
        .trim()
        .chars()
        .filter(|c| !MARKDOWN_PUNCTUATION.contains(c))
        .collect();
    let first_paragraph = plain.split("\n\n").next().unwrap_or_default();

    if first_paragraph.chars().count() <= max_length {
        return first_paragraph.to_owned();
    }

    let head: String = first_paragraph.chars().take(max_length).collect();
    // Back up to the last space so no word is cut mid-token. A paragraph
    // with no spaces at all is kept whole.
    let head = match head.rfind(' ') {
        Some(i) => &head[..i],
        None => head.as_str(),
    };
    format!("{}...", head)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_short_body_verbatim() {
        assert_eq!(
            "Hello world.",
            extract("Hello world.\n\nMore text.", DEFAULT_LENGTH)
        );
    }

    #[test]
    fn test_strips_markdown_punctuation() {
        assert_eq!(
            "Some bold and code text.",
            extract("Some **bold** and `code` text.", DEFAULT_LENGTH)
        );
    }

    #[test]
    fn test_first_paragraph_only() {
        assert_eq!(
            "First paragraph.",
            extract("First paragraph.\n\nSecond paragraph.\n\nThird.", DEFAULT_LENGTH)
        );
    }

    #[test]
    fn test_truncates_at_word_boundary() {
        let body = "word ".repeat(60);
        let excerpt = extract(&body, DEFAULT_LENGTH);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= DEFAULT_LENGTH + "...".len());
        // The truncation boundary is whitespace, so the final token before
        // the marker is a whole word.
        assert!(excerpt.trim_end_matches("...").ends_with("word"));
    }

    #[test]
    fn test_no_marker_under_limit() {
        let body = "short body";
        assert!(!extract(body, DEFAULT_LENGTH).contains("..."));
    }

    #[test]
    fn test_unbroken_token_kept_whole() {
        let body = "a".repeat(50);
        assert_eq!(format!("{}...", &body[..20]), extract(&body, 20));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!("", extract("", DEFAULT_LENGTH));
    }

    #[test]
    fn test_multibyte_paragraph() {
        // Lengths are counted in chars, so truncation can't land inside a
        // UTF-8 sequence.
        let body = "héllo wörld ".repeat(30);
        let excerpt = extract(&body, 40);
        assert!(excerpt.ends_with("..."));
        assert!(excerpt.chars().count() <= 40 + "...".len());
    }
}
