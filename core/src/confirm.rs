//! Asynchronous yes/no confirmation.
//!
//! Destructive operations await a [`Confirm`] implementation the same way
//! they await the transport, so a prompt never blocks the executor.

use async_trait::async_trait;

#[async_trait]
pub trait Confirm: Send + Sync {
    /// Ask the user `prompt`; `true` means proceed.
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers every prompt the same way without asking anyone.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, answer = self.0, "Auto-answering confirmation");
        self.0
    }
}
