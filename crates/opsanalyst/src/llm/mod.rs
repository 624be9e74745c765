//! Text generation backends and the prompts sent to them.
//!
//! Every backend implements [`LlmProvider`]: one prompt in, one block of
//! Markdown out. The pipeline never talks to a concrete client directly, so
//! tests and offline runs swap in [`MockProvider`].
//!
//! # Supported Providers
//!
//! - **Gemini** - `generateContent` API (requires `GEMINI_API_KEY`)
//! - **Mock** - canned responses, no network
//!
//! # Example
//!
//! ```no_run
//! use opsanalyst::{AnalystConfig, GeminiProvider, LlmProvider, ModelId};
//!
//! let config = AnalystConfig::from_env().unwrap();
//! let provider = GeminiProvider::from_config(&config).unwrap();
//! let text = provider.generate("Say hello", &ModelId::default()).unwrap();
//! println!("{}", text);
//! ```

mod gemini;
mod mock;
mod model;
mod prompts;
mod provider;

pub use gemini::GeminiProvider;
pub use mock::{MockProvider, MOCK_ANALYSIS, MOCK_SUMMARY};
pub use model::{ModelId, DEFAULT_MODEL, SUPPORTED_MODELS};
pub use prompts::{
    compose_analysis_prompt, compose_summary_prompt, SECTION_NAMES, SUMMARY_SYSTEM_PROMPT,
    SYSTEM_PROMPT,
};
pub use provider::LlmProvider;
