//! Allow-listed model identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalystError, Result};

/// Models the tool may call, in display order.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gemini-3-pro-preview",
    "gemini-3-pro-image-preview",
    "gemini-3-flash-preview",
    "gemini-2.5-flash",
    "gemini-2.5-flash-preview-09-2025",
    "gemini-2.5-flash-preview-12-2025",
];

/// Model used when none is selected.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// A model identifier known to be on the allow-list.
///
/// The string is passed to the provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    /// Validate a model name against the allow-list.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if SUPPORTED_MODELS.contains(&trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(AnalystError::UnknownModel(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// All allow-listed models.
    pub fn all() -> Vec<ModelId> {
        SUPPORTED_MODELS
            .iter()
            .map(|m| ModelId(m.to_string()))
            .collect()
    }
}

impl Default for ModelId {
    fn default() -> Self {
        Self(DEFAULT_MODEL.to_string())
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = AnalystError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModelId {
    type Error = AnalystError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ModelId> for String {
    fn from(model: ModelId) -> Self {
        model.0
    }
}
