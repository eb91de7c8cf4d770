//! Display helpers shared by every front end of the users resource.

#[cfg(test)]
#[path = "text_test.rs"]
mod text_test;

/// First `max_chars` characters of `text` followed by `...`, or `text`
/// unchanged when it is no longer than `max_chars`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
