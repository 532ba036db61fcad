//! Parsed chat input

/// Runtime control over the conversation context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Drop the history, keep the enabled flag
    Clear,
    /// Disable context and drop the history
    Off,
    /// Enable context
    On,
}

impl ControlCommand {
    /// Status string returned to the user after the command runs
    #[must_use]
    pub const fn status(self) -> &'static str {
        match self {
            Self::Clear => "context cleared.",
            Self::Off => "context off.",
            Self::On => "context on.",
        }
    }
}

/// A chat submission, resolved once at the top of request handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(ControlCommand),
    Question(String),
}

impl Input {
    /// Classify raw user text
    ///
    /// Only an exact keyword (ignoring surrounding whitespace and ASCII case) is a
    /// command. Anything else is a question, forwarded trimmed.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        let command = if text.eq_ignore_ascii_case("clear") {
            Some(ControlCommand::Clear)
        } else if text.eq_ignore_ascii_case("off") {
            Some(ControlCommand::Off)
        } else if text.eq_ignore_ascii_case("on") {
            Some(ControlCommand::On)
        } else {
            None
        };

        command.map_or_else(|| Self::Question(text.to_string()), Self::Command)
    }
}
