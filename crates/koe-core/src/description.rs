//! Cleanup of catalog text fields before they are stored.

use std::sync::LazyLock;

use regex::Regex;

/// Longest description kept, in characters.
pub const DESCRIPTION_LIMIT: usize = 800;

/// Appended to descriptions cut at [`DESCRIPTION_LIMIT`].
pub const ELLIPSIS: &str = "...";

static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#039;", "'"),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&mdash;", "\u{2014}"),
    ("&ndash;", "\u{2013}"),
    // Last, so `&amp;lt;` decodes to `&lt;` and not `<`.
    ("&amp;", "&"),
];

/// Remove markup from a provider description.
///
/// `<br>` becomes a newline, other tags are dropped, and the common
/// HTML entities are decoded.
pub fn strip_html(raw: &str) -> String {
    let text = RE_LINE_BREAK.replace_all(raw, "\n");
    let text = RE_TAG.replace_all(&text, "");
    let mut text = text.into_owned();
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text.trim().to_string()
}

/// Cut a description to [`DESCRIPTION_LIMIT`] characters, marking the cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        None => text.to_string(),
        Some((byte_idx, _)) => {
            let mut cut = text[..byte_idx].trim_end().to_string();
            cut.push_str(ELLIPSIS);
            cut
        }
    }
}

/// Convert a 0-100 provider score into a 0-10 rating with one decimal.
pub fn rating_from_score(score: Option<u32>) -> Option<f32> {
    let score = score?.min(100);
    Some(score as f32 / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_and_breaks() {
        assert_eq!(
            strip_html("<p>Line one<br/>Line <b>two</b></p>"),
            "Line one\nLine two"
        );
        assert_eq!(strip_html("A<BR>B<br />C"), "A\nB\nC");
    }

    #[test]
    fn test_strip_entities() {
        assert_eq!(
            strip_html("Tom &amp; Jerry&#039;s &quot;show&quot;"),
            "Tom & Jerry's \"show\""
        );
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(strip_html("  Just text.  "), "Just text.");
    }

    #[test]
    fn test_short_description_not_truncated() {
        let text = "a".repeat(DESCRIPTION_LIMIT);
        assert_eq!(truncate_description(&text), text);
    }

    #[test]
    fn test_long_description_truncated_with_ellipsis() {
        let text = "b".repeat(DESCRIPTION_LIMIT + 50);
        let cut = truncate_description(&text);
        assert!(cut.ends_with(ELLIPSIS));
        assert_eq!(cut.chars().count(), DESCRIPTION_LIMIT + ELLIPSIS.len());
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let text = "葬".repeat(DESCRIPTION_LIMIT + 1);
        let cut = truncate_description(&text);
        assert_eq!(cut.chars().count(), DESCRIPTION_LIMIT + ELLIPSIS.len());
    }

    #[test]
    fn test_rating_from_score() {
        assert_eq!(rating_from_score(Some(87)), Some(8.7));
        assert_eq!(rating_from_score(Some(100)), Some(10.0));
        assert_eq!(rating_from_score(Some(0)), Some(0.0));
        assert_eq!(rating_from_score(Some(250)), Some(10.0));
        assert_eq!(rating_from_score(None), None);
    }
}
