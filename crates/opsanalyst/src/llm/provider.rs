//! Text generation provider trait.

use crate::error::Result;

use super::model::ModelId;

/// A hosted text-generation model behind a single call.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can
/// serve concurrent web requests.
pub trait LlmProvider: Send + Sync {
    /// Send `prompt` to `model` and return the generated text verbatim.
    ///
    /// One blocking request per call: no retry, no streaming, no caching.
    fn generate(&self, prompt: &str, model: &ModelId) -> Result<String>;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;

    /// Whether calls need a configured API credential.
    fn requires_credential(&self) -> bool {
        true
    }
}
