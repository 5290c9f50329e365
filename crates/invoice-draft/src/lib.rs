//! Invoice Draft: free text to a structured invoice draft via a generative model
//!
//! # Pipeline Flow
//!
//! ```text
//! prompt text → Prompt Builder → Model Invoker → Response Extractor → Outcome
//!                    ↓                ↓                  ↓
//!              instruction     first candidate     first `{` .. last `}`
//!                string        with non-empty text    parsed as JSON
//! ```
//!
//! The model client is passed in explicitly, so tests swap in any
//! [`GenerativeModel`] implementation.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use invoice_draft::{DraftGenerator, GeminiClient, GeminiConfig};
//!
//! let client = GeminiClient::new(GeminiConfig::new(api_key))?;
//! let generator = DraftGenerator::with_default_candidates(Some(Arc::new(client)));
//!
//! let outcome = generator.generate_draft("Invoice John Doe $500 for consulting").await;
//! if let Some(draft) = outcome.data() {
//!     println!("{} drafted {}", outcome.model_used().unwrap_or("?"), draft);
//! }
//! ```

pub mod extract;
pub mod gemini;
pub mod generator;
pub mod invoker;
pub mod model;
pub mod outcome;
pub mod prompt;
pub mod shape;

pub use extract::{extract_draft, ExtractError};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_BASE_URL};
pub use generator::{DraftGenerator, DEFAULT_MODEL_CANDIDATES};
pub use invoker::{invoke, GenerationAttempt, Invocation, ALL_MODELS_FAILED};
pub use model::{GenerativeModel, ProviderError};
pub use outcome::{FailureKind, GenerationOutcome};
pub use prompt::{build_prompt, build_prompt_for, DraftTemplate};
pub use shape::response_text;
