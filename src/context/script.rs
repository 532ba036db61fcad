//! Foreign-script detection for context filtering
//!
//! The backend model occasionally drifts into CJK output. Such replies are
//! still shown to the user but kept out of the replayed history.

/// Check whether a character is a CJK ideograph
#[must_use]
pub const fn is_foreign_script(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}'
    )
}

/// Check whether any character of `text` is a CJK ideograph
#[must_use]
pub fn contains_foreign_script(text: &str) -> bool {
    text.chars().any(is_foreign_script)
}
