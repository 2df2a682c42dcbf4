//! Shaping of raw generated text into slide titles and slide bodies.

/// Suffix appended to a slide body that was cut short.
pub const ELLIPSIS: &str = "...";

/// Split a generated title list into individual titles.
///
/// The response is split on newlines and blank entries are dropped.
/// Non-blank entries are kept exactly as generated.
pub fn parse_titles(response: &str) -> Vec<String> {
    response
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Clip a slide body to `max_chars` characters.
///
/// Bodies longer than the budget keep their first `max_chars` characters and
/// get [`ELLIPSIS`] appended. Length is measured in Unicode scalar values.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            log::debug!(
                "Truncating slide content from {} to {} characters",
                content.chars().count(),
                max_chars
            );
            format!("{}{}", &content[..cut], ELLIPSIS)
        }
        None => content.to_string(),
    }
}

/// Split a slide body into the paragraphs of its text frame.
///
/// Carriage returns are dropped so CRLF and LF bodies produce the same
/// paragraphs.
pub fn paragraphs(body: &str) -> Vec<String> {
    body.split('\n')
        .map(|line| line.replace('\r', ""))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_titles_drops_blank_lines() {
        let response = "Intro to Bees\n\nHive Life\n   \nPollination\n";
        assert_eq!(
            parse_titles(response),
            vec!["Intro to Bees", "Hive Life", "Pollination"]
        );
    }

    #[test]
    fn test_parse_titles_keeps_entries_verbatim() {
        let response = "1. **Overview**\n  2. Details";
        assert_eq!(parse_titles(response), vec!["1. **Overview**", "  2. Details"]);
    }

    #[test]
    fn test_parse_titles_empty_response() {
        assert!(parse_titles("").is_empty());
        assert!(parse_titles("\n\n \n").is_empty());
    }

    #[test]
    fn test_truncate_short_content_unchanged() {
        assert_eq!(truncate_content("short", 200), "short");
    }

    #[test]
    fn test_truncate_exact_length_unchanged() {
        let content = "x".repeat(200);
        assert_eq!(truncate_content(&content, 200), content);
    }

    #[test]
    fn test_truncate_long_content() {
        let content = "y".repeat(201);
        let truncated = truncate_content(&content, 200);

        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("y..."));
        assert_eq!(&truncated[..200], &content[..200]);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let content = "é".repeat(10);
        let truncated = truncate_content(&content, 4);

        assert_eq!(truncated, "éééé...");
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(paragraphs("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(paragraphs("single"), vec!["single"]);
    }
}
