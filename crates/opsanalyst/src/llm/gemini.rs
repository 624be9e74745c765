//! Gemini `generateContent` provider implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{AnalystConfig, Credential};
use crate::error::{AnalystError, Result};

use super::model::ModelId;
use super::provider::LlmProvider;

/// Fixed request timeout. Generation of a full report can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gemini provider using the blocking reqwest client.
pub struct GeminiProvider {
    client: Client,
    api_key: Credential,
    base_url: String,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a provider for the given credential and API base URL.
    pub fn new(api_key: Credential, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnalystError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from the pipeline configuration.
    ///
    /// Fails with [`AnalystError::MissingCredential`] when no key is set.
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        let key = config
            .api_key
            .clone()
            .ok_or(AnalystError::MissingCredential)?;
        Self::new(key, config.base_url.clone())
    }

    fn endpoint(&self, model: &ModelId) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model.as_str())
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(self.api_key.expose())
            .map_err(|_| AnalystError::Config("API key contains invalid characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }
}

impl LlmProvider for GeminiProvider {
    fn generate(&self, prompt: &str, model: &ModelId) -> Result<String> {
        let body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        info!(model = %model, prompt_chars = prompt.len(), "Requesting generation");

        let response = self
            .client
            .post(self.endpoint(model))
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| AnalystError::RemoteService {
                status: None,
                message: format!("API request failed: {}", e.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            let err = classify_error(status.as_u16(), &error_text, model);
            warn!(status = status.as_u16(), error = %err, "Generation request failed");
            return Err(err);
        }

        let api_response: GenerateResponse =
            response.json().map_err(|e| AnalystError::RemoteService {
                status: Some(status.as_u16()),
                message: format!("Failed to parse API response: {}", e),
            })?;

        let text = api_response.text().ok_or_else(|| AnalystError::RemoteService {
            status: Some(status.as_u16()),
            message: match api_response.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => format!("Prompt blocked: {}", reason),
                None => "No text in API response".to_string(),
            },
        })?;

        debug!(response_chars = text.len(), "Generation complete");
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// The provider's message is kept for logs; [`AnalystError::user_message`]
/// never shows it.
pub(crate) fn classify_error(status: u16, body: &str, model: &ModelId) -> AnalystError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let lower = body.to_ascii_lowercase();

    let invalid_key = lower.contains("api_key_invalid")
        || lower.contains("api key not valid")
        || lower.contains("api key expired");
    let model_problem = lower.contains("is not found")
        || lower.contains("not supported for generatecontent")
        || lower.contains("location is not supported")
        || lower.contains("not available in your")
        || lower.contains("not enabled");

    match status {
        401 => AnalystError::Authentication(message),
        400 | 403 if invalid_key => AnalystError::Authentication(message),
        404 => AnalystError::ModelUnavailable {
            model: model.to_string(),
            message,
        },
        400 | 403 if model_problem => AnalystError::ModelUnavailable {
            model: model.to_string(),
            message,
        },
        _ => AnalystError::RemoteService {
            status: Some(status),
            message,
        },
    }
}

/// `generateContent` response structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
