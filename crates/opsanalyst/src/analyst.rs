//! Main Analyst struct and public API.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{AnalystConfig, SummaryStrategy};
use crate::error::{AnalystError, Result};
use crate::input::{Loader, RecordTable, SourceMetadata};
use crate::llm::{compose_analysis_prompt, compose_summary_prompt, GeminiProvider, LlmProvider, ModelId};
use crate::normalize::Normalizer;
use crate::report::{compute_metrics, extract_bullets, profit_by_key, AnalysisReport, MAX_SUMMARY_BULLETS};
use crate::stats::{Summarizer, SummaryDocument};

/// What the user sees right after upload, before any analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPreview {
    pub source: SourceMetadata,
    pub headers: Vec<String>,
    /// First rows, rendered as strings.
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    /// Statistical summary table as sent to the model.
    pub summary_text: String,
}

/// The analysis pipeline: load, summarize, prompt, generate, normalize, report.
pub struct Analyst {
    config: AnalystConfig,
    loader: Loader,
    summarizer: Summarizer,
    normalizer: Normalizer,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl Analyst {
    /// Create an analyst that talks to Gemini when a credential is configured.
    ///
    /// Without a credential the analyst can still load and describe data;
    /// [`Analyst::analyze`] then fails with [`AnalystError::MissingCredential`].
    pub fn from_config(config: AnalystConfig) -> Result<Self> {
        let provider: Option<Arc<dyn LlmProvider>> = if config.has_credential() {
            Some(Arc::new(GeminiProvider::from_config(&config)?))
        } else {
            None
        };
        Ok(Self::build(config, provider))
    }

    /// Create an analyst with an explicit provider.
    pub fn with_provider(config: AnalystConfig, provider: impl LlmProvider + 'static) -> Self {
        Self::build(config, Some(Arc::new(provider)))
    }

    /// Create an analyst sharing an existing provider.
    pub fn with_shared_provider(config: AnalystConfig, provider: Arc<dyn LlmProvider>) -> Self {
        Self::build(config, Some(provider))
    }

    fn build(config: AnalystConfig, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            loader: Loader::with_config(config.parser.clone()),
            summarizer: Summarizer::new(),
            normalizer: Normalizer::standard(),
            config,
            provider,
        }
    }

    pub fn config(&self) -> &AnalystConfig {
        &self.config
    }

    /// Name of the configured provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Load CSV bytes into a table.
    pub fn load(&self, bytes: &[u8]) -> Result<RecordTable> {
        self.loader
            .load(bytes)
            .ok_or_else(|| AnalystError::Input("the uploaded data is not a readable CSV".to_string()))
    }

    /// Summary statistics for CSV bytes. No network access.
    pub fn describe(&self, bytes: &[u8]) -> Result<SummaryDocument> {
        let table = self.load(bytes)?;
        Ok(self.summarizer.summarize(&table))
    }

    /// Load CSV bytes and build the upload preview.
    pub fn preview(&self, file_name: &str, bytes: &[u8]) -> Result<DataPreview> {
        let table = self.load(bytes)?;
        let summary = self.summarizer.summarize(&table);
        Ok(DataPreview {
            source: SourceMetadata::new(file_name, bytes, table.row_count(), table.column_count()),
            headers: table.headers.clone(),
            rows: table.preview(self.config.preview_rows),
            total_rows: table.row_count(),
            summary_text: summary.to_text(),
        })
    }

    /// Analyze CSV bytes with the configured model.
    pub fn analyze(&self, file_name: &str, bytes: &[u8]) -> Result<AnalysisReport> {
        self.analyze_with_model(file_name, bytes, &self.config.model)
    }

    /// Analyze CSV bytes with a specific model.
    ///
    /// Fails before any external call when the data cannot be read or no
    /// credential is configured.
    pub fn analyze_with_model(
        &self,
        file_name: &str,
        bytes: &[u8],
        model: &ModelId,
    ) -> Result<AnalysisReport> {
        let table = self.load(bytes)?;
        let source = SourceMetadata::new(file_name, bytes, table.row_count(), table.column_count());
        let provider = self.ready_provider()?;

        info!(
            file = %source.file,
            rows = table.row_count(),
            columns = table.column_count(),
            model = %model,
            provider = provider.name(),
            "Starting analysis"
        );

        let summary = self.summarizer.summarize(&table);
        let prompt = compose_analysis_prompt(&summary);
        debug!(prompt_chars = prompt.len(), "Composed analysis prompt");

        let analysis_raw = provider.generate(&prompt, model)?;
        let analysis = self.normalizer.normalize(&analysis_raw);
        debug!(
            raw_chars = analysis_raw.len(),
            normalized_chars = analysis.len(),
            "Normalized analysis"
        );

        let executive_summary = self.executive_summary(provider, &analysis, model);

        let metrics = compute_metrics(&table);
        debug!(records = metrics.len(), "Derived metrics");

        Ok(AnalysisReport {
            source,
            headers: table.headers.clone(),
            preview: table.preview(self.config.preview_rows),
            summary,
            profit_breakdown: profit_by_key(&table),
            metrics,
            model: model.clone(),
            analysis_raw,
            analysis,
            executive_summary,
            precision: self.config.precision,
            generated_at: Utc::now(),
        })
    }

    /// Provider to call, once the credential requirement is met.
    fn ready_provider(&self) -> Result<&dyn LlmProvider> {
        match self.provider.as_deref() {
            Some(p) if self.config.has_credential() || !p.requires_credential() => Ok(p),
            _ => Err(AnalystError::MissingCredential),
        }
    }

    /// Derive the executive summary from the finished analysis.
    ///
    /// A failed or bullet-less summary request falls back to local
    /// extraction; the detailed analysis is never discarded for it.
    fn executive_summary(&self, provider: &dyn LlmProvider, analysis: &str, model: &ModelId) -> Vec<String> {
        if self.config.summary_strategy == SummaryStrategy::Extract {
            return extract_bullets(analysis, MAX_SUMMARY_BULLETS);
        }

        match provider.generate(&compose_summary_prompt(analysis), model) {
            Ok(text) => {
                let bullets = extract_bullets(&self.normalizer.normalize(&text), MAX_SUMMARY_BULLETS);
                if bullets.is_empty() {
                    warn!("Summary response had no bullets; extracting from analysis");
                    extract_bullets(analysis, MAX_SUMMARY_BULLETS)
                } else {
                    bullets
                }
            }
            Err(e) => {
                warn!(error = %e, "Summary request failed; extracting from analysis");
                extract_bullets(analysis, MAX_SUMMARY_BULLETS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockProvider, MOCK_SUMMARY};

    const CSV: &[u8] = b"Client,Revenue,Expenses,Hours Worked\nA,1000,600,10\nB,500,550,4\nC,0,20,1\n";

    fn keyed() -> AnalystConfig {
        AnalystConfig::default().with_api_key("test-key")
    }

    #[test]
    fn test_missing_credential_makes_no_call() {
        let mock = Arc::new(MockProvider::new());
        let analyst = Analyst::with_shared_provider(AnalystConfig::default(), mock.clone());

        let err = analyst.analyze("ops.csv", CSV).unwrap_err();
        assert!(matches!(err, AnalystError::MissingCredential));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_no_provider_is_missing_credential() {
        let analyst = Analyst::from_config(AnalystConfig::default()).unwrap();
        assert!(analyst.provider_name().is_none());
        assert!(matches!(
            analyst.analyze("ops.csv", CSV),
            Err(AnalystError::MissingCredential)
        ));
    }

    #[test]
    fn test_unreadable_csv_is_input_error() {
        let mock = Arc::new(MockProvider::new());
        let analyst = Analyst::with_shared_provider(keyed(), mock.clone());

        let err = analyst.analyze("bad.csv", b"").unwrap_err();
        assert!(matches!(err, AnalystError::Input(_)));
        assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn test_model_strategy_makes_two_scoped_calls() {
        let mock = Arc::new(MockProvider::new());
        let analyst = Analyst::with_shared_provider(keyed(), mock.clone());

        let report = analyst.analyze("ops.csv", CSV).unwrap();
        let prompts = mock.prompts();

        assert_eq!(mock.calls(), 2);
        assert!(prompts[0].contains("Here is a summary of business data"));
        assert!(prompts[1].contains(&report.analysis));
        assert_eq!(report.executive_summary.len(), 5);
        assert_eq!(
            report.executive_summary[0],
            MOCK_SUMMARY.lines().next().unwrap().trim_start_matches("- ")
        );
    }

    #[test]
    fn test_extract_strategy_makes_one_call() {
        let mock = Arc::new(MockProvider::new());
        let config = keyed().with_summary_strategy(SummaryStrategy::Extract);
        let analyst = Analyst::with_shared_provider(config, mock.clone());

        let report = analyst.analyze("ops.csv", CSV).unwrap();
        assert_eq!(mock.calls(), 1);
        assert_eq!(report.executive_summary.len(), 5);
    }

    #[test]
    fn test_report_contents() {
        let analyst = Analyst::with_provider(keyed(), MockProvider::new());
        let report = analyst.analyze("uploads/ops.csv", CSV).unwrap();

        assert_eq!(report.source.file, "ops.csv");
        assert_eq!(report.headers, vec!["client", "revenue", "expenses", "hours_worked"]);
        assert_eq!(report.metrics.len(), 3);
        assert_eq!(report.metrics[2].margin, None);
        assert_eq!(report.model, ModelId::default());
        assert!(report.analysis.starts_with("## Analysis Overview"));
    }

    /// Answers the first call, fails every later one.
    struct FirstCallOnly(std::sync::atomic::AtomicUsize);

    impl LlmProvider for FirstCallOnly {
        fn generate(&self, _prompt: &str, _model: &ModelId) -> Result<String> {
            match self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst) {
                0 => Ok("## Profit Leaks\n-Client B loses money\n- Fees are waived".to_string()),
                _ => Err(AnalystError::RemoteService {
                    status: Some(503),
                    message: "overloaded".to_string(),
                }),
            }
        }

        fn name(&self) -> &str {
            "first-call-only"
        }
    }

    #[test]
    fn test_failed_summary_call_falls_back() {
        let analyst = Analyst::with_provider(keyed(), FirstCallOnly(Default::default()));
        let report = analyst.analyze("ops.csv", CSV).unwrap();

        assert_eq!(
            report.executive_summary,
            vec!["Client B loses money", "Fees are waived"]
        );
    }

    #[test]
    fn test_offline_mock_needs_no_credential() {
        let analyst = Analyst::with_provider(AnalystConfig::default(), MockProvider::new().offline());
        assert!(analyst.analyze("ops.csv", CSV).is_ok());
    }

    #[test]
    fn test_preview_limits_rows() {
        let mut csv = String::from("client,revenue,expenses\n");
        for i in 0..40 {
            csv.push_str(&format!("C{},{},{}\n", i, 100 + i, 50));
        }
        let analyst = Analyst::from_config(AnalystConfig::default()).unwrap();
        let preview = analyst.preview("big.csv", csv.as_bytes()).unwrap();

        assert_eq!(preview.total_rows, 40);
        assert_eq!(preview.rows.len(), 15);
        assert!(preview.summary_text.contains("mean"));
    }
}
