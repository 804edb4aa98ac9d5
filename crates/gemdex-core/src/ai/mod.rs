pub mod gemini;

use async_trait::async_trait;

use crate::error::GeminiError;

pub use gemini::{Candidate, CandidateContent, ContentPart, GeminiClient, GenerateResponse};

/// A single-turn text generation backend.
///
/// The prompt is the whole conversation: implementations must not keep or
/// send earlier turns.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, GeminiError>;
}
