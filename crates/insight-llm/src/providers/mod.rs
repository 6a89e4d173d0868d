//! Concrete text-generation provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the supported inference services.

#[cfg(feature = "huggingface")]
pub mod huggingface;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "huggingface")]
pub use huggingface::{HuggingFaceConfig, HuggingFaceProvider};

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};
