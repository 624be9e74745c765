//! Mock LLM provider for testing and offline runs.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{AnalystError, Result};

use super::model::ModelId;
use super::provider::LlmProvider;

/// Canned detailed analysis, already in the expected section layout.
pub const MOCK_ANALYSIS: &str = "## Analysis Overview
Revenue is concentrated in a small number of clients and overall margins are healthy.

## Profit Leaks
- Projects with expenses close to revenue leave almost no profit.
- Discounted work is not offset by shorter delivery times.

## Inefficiencies
- Hours worked vary widely for similar revenue.

## Anomalies
- One record shows expenses above revenue.

## Actionable Recommendations
- Reprice the lowest margin engagements.
- Track hours against budget every week.
- Review supplier costs on the most expensive projects.
- Drop or renegotiate clients with negative profit.
- Standardize scoping for recurring work.
";

/// Canned executive summary bullets.
pub const MOCK_SUMMARY: &str = "- Margins are healthy overall but uneven across clients.
- Some projects barely break even once expenses are counted.
- Hours spent do not track revenue closely.
- At least one record loses money outright.
- Repricing and weekly budget tracking are the quickest wins.
";

type FailureFn = Box<dyn Fn() -> AnalystError + Send + Sync>;

/// Mock provider that returns predictable responses.
///
/// Queued responses are returned first, in order. Once the queue is empty
/// the provider answers summary prompts with [`MOCK_SUMMARY`] and anything
/// else with [`MOCK_ANALYSIS`].
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    failure: Option<FailureFn>,
    offline: bool,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single response.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_responses([text])
    }

    /// Queue several responses, returned in order.
    pub fn with_responses<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut queue) = self.responses.lock() {
            queue.extend(texts.into_iter().map(Into::into));
        }
        self
    }

    /// Make every call fail with the error built by `make_error`.
    pub fn failing_with<F>(mut self, make_error: F) -> Self
    where
        F: Fn() -> AnalystError + Send + Sync + 'static,
    {
        self.failure = Some(Box::new(make_error));
        self
    }

    /// Allow calls without a configured credential.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Number of `generate` calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl LlmProvider for MockProvider {
    fn generate(&self, prompt: &str, _model: &ModelId) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(make_error) = &self.failure {
            return Err(make_error());
        }

        let queued = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        Ok(queued.unwrap_or_else(|| {
            if prompt.contains("extract ONLY 5 bullets") {
                MOCK_SUMMARY.to_string()
            } else {
                MOCK_ANALYSIS.to_string()
            }
        }))
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn requires_credential(&self) -> bool {
        !self.offline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts::compose_summary_prompt;

    #[test]
    fn test_queued_responses_in_order() {
        let mock = MockProvider::new().with_responses(["first", "second"]);
        let model = ModelId::default();

        assert_eq!(mock.generate("a", &model).unwrap(), "first");
        assert_eq!(mock.generate("b", &model).unwrap(), "second");
        assert_eq!(mock.generate("c", &model).unwrap(), MOCK_ANALYSIS);
        assert_eq!(mock.calls(), 3);
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_summary_prompt_gets_bullets() {
        let mock = MockProvider::new();
        let text = mock
            .generate(&compose_summary_prompt(MOCK_ANALYSIS), &ModelId::default())
            .unwrap();
        assert_eq!(text, MOCK_SUMMARY);
    }

    #[test]
    fn test_failure_is_counted() {
        let mock = MockProvider::new().failing_with(|| AnalystError::Authentication("bad key".into()));
        let err = mock.generate("x", &ModelId::default()).unwrap_err();

        assert!(matches!(err, AnalystError::Authentication(_)));
        assert_eq!(mock.calls(), 1);
    }
}
