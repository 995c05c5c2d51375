//! # Budget Lens AI Client
//!
//! The narrative-text collaborator: hands serialized statistics and simulation
//! summaries to a chat-completion service and returns its prose. Failures never
//! reach the caller as errors; `FinancialAi` logs them and returns a fixed
//! unavailability message instead.
//!
//! ## Public API
//!
//! - `NarrativeClient`: the transport seam (OpenRouter in production, stubs in tests).
//! - `OpenRouterClient`: the reqwest-backed implementation.
//! - `FinancialAi`: prompt construction and failure handling.
//! - `create_ai_client`: builds the production client when an API key is configured.

pub mod analyst;
pub mod client;
pub mod error;
pub mod responses;

pub use analyst::{
    create_ai_client, AnalysisRequest, FinancialAi, SharedNarrativeClient, UNAVAILABLE_MESSAGE,
};
pub use client::{NarrativeClient, OpenRouterClient};
pub use error::AiError;
