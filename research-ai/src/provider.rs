//! Text-generation provider trait.

use crate::Error;
use async_trait::async_trait;

/// Abstraction for LLM-powered text generation.
///
/// Implementations send a fully assembled prompt to a hosted model and return
/// the raw text of the first candidate response. Prompt construction lives in
/// [`crate::prompt`] so every provider receives identical instructions.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a completion for the given prompt.
    ///
    /// Returns the raw model output. Callers that asked for JSON in the prompt
    /// are responsible for parsing it and handling malformed output.
    async fn generate(&self, prompt: &str) -> Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "vertex_ai").
    ///
    /// Must be lowercase, alphanumeric with underscores only.
    fn provider_id(&self) -> &str;
}
