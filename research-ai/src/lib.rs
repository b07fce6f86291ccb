//! Research AI abstraction layer for analysis-generation providers.
//!
//! This crate provides trait-based abstractions for LLM-backed research
//! assistance:
//! - Statistical method recommendations for a research design
//! - Interpretation of analysis output in plain language
//! - Project-level research summaries and refinement passes
//!
//! The design is provider-agnostic, enabling applications to swap between
//! different model providers (Vertex AI Gemini, OpenAI, Anthropic, etc.)
//! without changing application code.

pub mod error;
pub mod prompt;
pub mod provider;

// Re-export commonly used types
pub use error::Error;
pub use provider::Provider;
