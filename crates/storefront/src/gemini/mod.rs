//! Generative-AI client (Gemini `generateContent`).
//!
//! One call shape: a text prompt plus a JSON schema, answered with JSON
//! text conforming to it. No streaming, no retries, no client-side
//! timeout. Interpretation of the JSON is left to the recipe advisor.

mod client;
mod error;
pub mod types;

pub use client::GeminiClient;
pub use error::GeminiError;
