//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for text-generation providers
///
/// Implementations of this trait provide access to different inference
/// services (e.g., a Hugging Face text2text endpoint or an OpenAI-compatible
/// chat server). Callers only rely on "prompt in, text out".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the model
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with messages and decoding parameters
    ///
    /// # Returns
    ///
    /// The completion response with the generated message and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "huggingface", "openai")
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, StopReason, TokenUsage};

    #[tokio::test]
    async fn test_mock_provider_roundtrip() {
        let mut provider = MockLLMProvider::new();
        provider.expect_complete().returning(|request| {
            let prompt = request.prompt_text();
            Ok(CompletionResponse {
                message: Message::assistant(format!("echo: {prompt}")),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        });
        provider.expect_name().return_const("mock");

        let request = CompletionRequest::builder("t5-small")
            .add_message(Message::user("hello"))
            .build();
        let response = provider.complete(request).await.unwrap();

        assert_eq!(response.message.text(), Some("echo: hello"));
        assert_eq!(provider.name(), "mock");
    }
}
