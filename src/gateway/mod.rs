//! Single-flight inference gateway
//!
//! Control commands mutate the context directly. Questions go through a gate
//! that admits one backend call at a time; a second caller is told the gateway
//! is busy instead of being queued.

mod command;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

pub use command::{ControlCommand, Input};

use crate::backend::{Backend, Prompt};
use crate::context::ContextStore;
use crate::error::GatewayError;

/// Gateway in front of a single inference backend
#[derive(Clone)]
pub struct InferenceGateway {
    context: Arc<ContextStore>,
    backend: Arc<dyn Backend>,
    /// One permit; held by the task running the backend call
    gate: Arc<Semaphore>,
    timeout: Duration,
}

impl std::fmt::Debug for InferenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceGateway")
            .field("backend", &self.backend.name())
            .field("timeout", &self.timeout)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl InferenceGateway {
    /// Create a gateway over a backend and a shared context
    #[must_use]
    pub fn new(context: Arc<ContextStore>, backend: Arc<dyn Backend>, timeout: Duration) -> Self {
        Self {
            context,
            backend,
            gate: Arc::new(Semaphore::new(1)),
            timeout,
        }
    }

    /// The conversation context this gateway reads and updates
    #[must_use]
    pub const fn context(&self) -> &Arc<ContextStore> {
        &self.context
    }

    /// Whether a backend call currently holds the gate
    ///
    /// Only observes the permit count, so polling never makes a caller busy.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.available_permits() == 0
    }

    /// Handle one chat submission
    ///
    /// Control commands always succeed immediately, even while the gate is held.
    /// Questions are forwarded to the backend if the gate is free.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Busy`] if another call is in flight, and the
    /// matching kind if the backend times out, fails, or answers without a reply.
    /// Context is left untouched on every error.
    pub async fn handle(&self, question: &str) -> Result<String, GatewayError> {
        match Input::parse(question) {
            Input::Command(command) => Ok(self.apply(command).to_string()),
            Input::Question(text) => self.ask(text).await,
        }
    }

    fn apply(&self, command: ControlCommand) -> &'static str {
        match command {
            ControlCommand::Clear => self.context.clear(),
            ControlCommand::Off => self.context.set_enabled(false),
            ControlCommand::On => self.context.set_enabled(true),
        }
        tracing::debug!(?command, "context command applied");
        command.status()
    }

    async fn ask(&self, question: String) -> Result<String, GatewayError> {
        let Ok(permit) = Arc::clone(&self.gate).try_acquire_owned() else {
            tracing::warn!("backend busy, rejecting request");
            return Err(GatewayError::Busy);
        };

        // The call runs detached so an abandoned request still finishes and
        // releases the gate.
        let task = tokio::spawn(infer(
            permit,
            Arc::clone(&self.context),
            Arc::clone(&self.backend),
            self.timeout,
            question,
        ));

        task.await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "inference task failed");
            Err(GatewayError::BackendUnavailable(format!(
                "inference task failed: {e}"
            )))
        })
    }
}

async fn infer(
    _permit: OwnedSemaphorePermit,
    context: Arc<ContextStore>,
    backend: Arc<dyn Backend>,
    timeout: Duration,
    question: String,
) -> Result<String, GatewayError> {
    let prompt = Prompt::compose(&context.render(), &question);
    tracing::debug!(
        backend = backend.name(),
        input_len = prompt.input.len(),
        "sending prompt"
    );
    tracing::trace!(prompt = %prompt.full_text(), "composed prompt");

    let reply = match tokio::time::timeout(timeout, backend.complete(&prompt)).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            tracing::warn!(backend = backend.name(), error = %e, "backend call failed");
            return Err(e.into());
        }
        Err(_) => {
            tracing::warn!(
                backend = backend.name(),
                timeout_secs = timeout.as_secs_f64(),
                "backend call timed out"
            );
            return Err(GatewayError::Timeout);
        }
    };

    context.append(&reply);
    Ok(reply)
}
