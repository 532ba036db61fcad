//! Bounded conversation context
//!
//! The backend model has no memory of its own. Recent replies are kept in a
//! small FIFO window and replayed as fenced blocks ahead of each new question.

mod script;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

pub use script::{contains_foreign_script, is_foreign_script};

use crate::config::ContextConfig;

/// Fence marker wrapped around each replayed reply
const FENCE: &str = "```";

/// Process-wide conversation context
///
/// Mutation is synchronized internally and never waits on the inference gate,
/// so control commands stay responsive while a backend call is in flight.
#[derive(Debug)]
pub struct ContextStore {
    state: Mutex<ContextState>,
    max_depth: usize,
    filter_foreign_script: bool,
}

#[derive(Debug)]
struct ContextState {
    entries: VecDeque<String>,
    enabled: bool,
}

impl ContextStore {
    /// Create an empty store
    #[must_use]
    pub fn new(enabled: bool, max_depth: usize, filter_foreign_script: bool) -> Self {
        Self {
            state: Mutex::new(ContextState {
                entries: VecDeque::new(),
                enabled,
            }),
            max_depth,
            filter_foreign_script,
        }
    }

    /// Create an empty store from configuration
    #[must_use]
    pub fn from_config(config: &ContextConfig) -> Self {
        Self::new(config.enabled, config.max_depth, config.filter_non_latin)
    }

    fn lock(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Render the history as a prompt prefix
    ///
    /// Returns an empty string when context is disabled or empty. Otherwise each
    /// entry, oldest first, is wrapped in its own fenced block followed by a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let state = self.lock();
        if !state.enabled {
            return String::new();
        }

        state.entries.iter().fold(String::new(), |mut out, entry| {
            out.push_str(FENCE);
            out.push('\n');
            out.push_str(entry);
            out.push('\n');
            out.push_str(FENCE);
            out.push('\n');
            out
        })
    }

    /// Record a backend reply
    ///
    /// Ignored while disabled, and ignored for replies containing foreign-script
    /// characters when the filter is on. Evicts the oldest entry once the window
    /// exceeds `max_depth`.
    pub fn append(&self, reply: &str) {
        let mut state = self.lock();
        if !state.enabled {
            return;
        }

        if self.filter_foreign_script && contains_foreign_script(reply) {
            tracing::debug!("reply contains foreign script, not added to context");
            return;
        }

        state.entries.push_back(reply.to_string());
        if state.entries.len() > self.max_depth {
            state.entries.pop_front();
        }

        tracing::debug!(entries = state.entries.len(), "context updated");
    }

    /// Drop all entries, leaving the enabled flag alone
    pub fn clear(&self) {
        self.lock().entries.clear();
        tracing::debug!("context cleared");
    }

    /// Turn context on or off
    ///
    /// Disabling also discards the history, so re-enabling starts fresh.
    pub fn set_enabled(&self, enabled: bool) {
        let mut state = self.lock();
        state.enabled = enabled;
        if !enabled {
            state.entries.clear();
        }
        tracing::debug!(enabled, "context toggled");
    }

    /// Whether context is currently composed into prompts
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Snapshot of the retained entries, oldest first
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Number of retained entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no entries are retained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Maximum number of retained entries
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}
