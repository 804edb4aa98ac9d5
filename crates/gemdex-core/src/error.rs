//! Typed errors for the remote services.
//!
//! The views only ever show a fixed string per failure class, but the
//! variants keep the cause around so it can be logged.

use thiserror::Error;

/// Failures of the Gemini `generateContent` call.
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Gemini API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Gemini API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Gemini request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Failures of the PokeAPI list and detail endpoints.
#[derive(Debug, Error)]
pub enum SpeciesError {
    #[error("Pokémon not found")]
    NotFound { name: String },

    #[error("PokeAPI returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("PokeAPI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected PokeAPI payload: {0}")]
    Decode(#[from] serde_json::Error),
}
