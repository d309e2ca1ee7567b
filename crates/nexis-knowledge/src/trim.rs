//! Sentence trimming for spoken answers.

/// Longest answer kept when the text has no sentence boundary at all.
const MAX_UNSPLIT_CHARS: usize = 300;

/// Keep the first `max` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace. Text with no
/// usable sentence is cut to its first 300 characters instead.
pub fn trim_sentences(text: &str, max: usize) -> String {
    let text = text.trim();
    let mut sentences: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next, ws)) = chars.peek() {
            if ws.is_whitespace() {
                sentences.push(&text[start..next]);
                while chars.peek().is_some_and(|(_, w)| w.is_whitespace()) {
                    chars.next();
                }
                start = chars.peek().map_or(text.len(), |(j, _)| *j);
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }

    let trimmed = sentences
        .iter()
        .take(max)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if trimmed.is_empty() {
        text.chars().take(MAX_UNSPLIT_CHARS).collect()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_two_sentences() {
        let text = "Rust is a language. It is fast!  Is it safe? Yes.";
        assert_eq!(trim_sentences(text, 2), "Rust is a language. It is fast!");
    }

    #[test]
    fn test_fewer_sentences_than_limit() {
        assert_eq!(trim_sentences("Only one here.", 3), "Only one here.");
    }

    #[test]
    fn test_decimal_points_do_not_split() {
        let text = "Pi is about 3.14 in value. Next.";
        assert_eq!(trim_sentences(text, 1), "Pi is about 3.14 in value.");
    }

    #[test]
    fn test_zero_limit_falls_back_to_prefix() {
        let long = "x".repeat(500);
        assert_eq!(trim_sentences(&long, 0).len(), 300);
    }

    #[test]
    fn test_trailing_text_without_terminator() {
        assert_eq!(
            trim_sentences("First. second part", 2),
            "First. second part"
        );
    }
}
