//! Generation service client
//!
//! This module handles:
//! - The wire format of the Gemini generateContent endpoint (types.rs)
//! - One request/response cycle per generation (client.rs)

pub mod client;
pub mod types;

pub use client::{GeminiClient, GenerationError};
pub use types::AspectRatio;
