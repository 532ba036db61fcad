//! Display wrapping for chat answers

/// Wrap an answer in the tag the browser-side markdown renderer picks up
#[must_use]
pub fn wrap_markdown(text: &str) -> String {
    format!("<md class='markdown-style'>{text}</md>")
}
