//! Runtime configuration, resolved once at startup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::ParserConfig;
use crate::llm::ModelId;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable selecting the default model.
pub const MODEL_ENV: &str = "OPSANALYST_MODEL";
/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "OPSANALYST_BASE_URL";

/// Default generative language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// How the executive summary is derived from the detailed analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStrategy {
    /// Second request whose input is the detailed analysis.
    #[default]
    Model,
    /// Pull bullets out of the detailed analysis locally.
    Extract,
}

/// Configuration for the analysis pipeline.
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// API credential (None = not configured).
    pub api_key: Option<Credential>,
    /// Model to call.
    pub model: ModelId,
    /// Base URL of the generation API.
    pub base_url: String,
    /// CSV loader settings.
    pub parser: ParserConfig,
    /// Executive summary derivation.
    pub summary_strategy: SummaryStrategy,
    /// Decimal places in the metrics table.
    pub precision: usize,
    /// Rows shown in data previews.
    pub preview_rows: usize,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: ModelId::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            parser: ParserConfig::default(),
            summary_strategy: SummaryStrategy::default(),
            precision: 2,
            preview_rows: 15,
        }
    }
}

impl AnalystConfig {
    /// Read credential, model and base URL from the environment.
    ///
    /// An empty credential counts as absent. An unknown model name is an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(|k| Credential::new(k.trim()));

        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = ModelId::parse(&model)?;
        }

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            config.base_url = url;
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(Credential::new(key));
        self
    }

    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_summary_strategy(mut self, strategy: SummaryStrategy) -> Self {
        self.summary_strategy = strategy;
        self
    }

    /// Set decimal places, capped at [`MAX_PRECISION`](crate::report::MAX_PRECISION).
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision.min(crate::report::MAX_PRECISION);
        self
    }

    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_debug_is_redacted() {
        let config = AnalystConfig::default().with_api_key("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("Credential(***)"));
    }

    #[test]
    fn test_defaults() {
        let config = AnalystConfig::default();
        assert!(!config.has_credential());
        assert_eq!(config.precision, 2);
        assert_eq!(config.preview_rows, 15);
        assert_eq!(config.summary_strategy, SummaryStrategy::Model);
    }

    #[test]
    fn test_precision_is_capped() {
        let config = AnalystConfig::default().with_precision(1_000);
        assert_eq!(config.precision, crate::report::MAX_PRECISION);
    }
}
