//! Error types for the opsanalyst library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for opsanalyst operations.
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded data could not be read as a CSV table.
    #[error("Input error: {0}")]
    Input(String),

    /// No API credential was configured.
    #[error("API credential is not configured")]
    MissingCredential,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model name is not on the allow-list.
    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// The provider rejected the credential.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The selected model is not enabled for this credential or region.
    #[error("Model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    /// Any other failure of the remote generation call.
    #[error("Remote service error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteService {
        status: Option<u16>,
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// PDF construction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Coarse classification of failures, used to pick how they are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable upload.
    Input,
    /// Missing or invalid local configuration.
    Configuration,
    /// The external model call failed.
    RemoteService,
    /// Local failure unrelated to user input.
    Internal,
}

impl AnalystError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalystError::Input(_) => ErrorKind::Input,
            AnalystError::MissingCredential
            | AnalystError::Config(_)
            | AnalystError::UnknownModel(_) => ErrorKind::Configuration,
            AnalystError::Authentication(_)
            | AnalystError::ModelUnavailable { .. }
            | AnalystError::RemoteService { .. } => ErrorKind::RemoteService,
            AnalystError::Io { .. }
            | AnalystError::Json(_)
            | AnalystError::Pdf(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show an end user.
    ///
    /// Remote failures never include provider-supplied text.
    pub fn user_message(&self) -> String {
        match self {
            AnalystError::Input(_) => "Failed to read CSV file.".to_string(),
            AnalystError::MissingCredential => {
                "Gemini API key is missing. Set GEMINI_API_KEY and try again.".to_string()
            }
            AnalystError::Config(msg) => format!("Configuration error: {}", msg),
            AnalystError::UnknownModel(name) => format!(
                "'{}' is not a supported model. Run `opsanalyst models` to list them.",
                name
            ),
            AnalystError::Authentication(_) => {
                "Analysis failed: the API key was rejected by the provider.".to_string()
            }
            AnalystError::ModelUnavailable { model, .. } => format!(
                "Analysis failed: model '{}' is not available for this API key. Try another model.",
                model
            ),
            AnalystError::RemoteService { .. } => {
                "Analysis failed. Please try again later.".to_string()
            }
            AnalystError::Io { path, .. } => format!("Could not access '{}'.", path.display()),
            AnalystError::Json(_) | AnalystError::Pdf(_) => {
                "Report generation failed.".to_string()
            }
        }
    }
}

/// Result type alias for opsanalyst operations.
pub type Result<T> = std::result::Result<T, AnalystError>;
