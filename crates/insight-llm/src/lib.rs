//! Text-generation provider abstraction for stock-insight
//!
//! This crate provides provider-agnostic abstractions for asking a pretrained
//! language model for free text. It includes:
//!
//! - Message types for prompts
//! - Completion request/response types, including beam and sampling parameters
//! - Provider trait for text-generation backends
//! - Concrete provider implementations (behind feature flags)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{
    CompletionRequest, CompletionResponse, GenerationParams, StopReason, TokenUsage,
};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "huggingface", feature = "openai"))]
pub mod providers;
