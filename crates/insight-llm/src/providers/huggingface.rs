//! Hugging Face inference provider
//!
//! Sends the flattened prompt to a text2text-generation endpoint
//! (`POST {api_base}/{model}`), which is how seq2seq checkpoints such as
//! T5 fine-tunes are served. Works against the hosted Inference API and
//! against self-hosted servers exposing the same route.
//!
//! ```no_run
//! use insight_llm::{CompletionRequest, LLMProvider, Message};
//! use insight_llm::providers::{HuggingFaceConfig, HuggingFaceProvider};
//!
//! # async fn run() -> insight_llm::Result<()> {
//! let provider = HuggingFaceProvider::with_config(
//!     HuggingFaceConfig::new().with_token("hf_..."),
//! )?;
//! let request = CompletionRequest::builder("AventIQ-AI/t5-stockmarket-qa-chatbot")
//!     .add_message(Message::user("Question: Is TCS overbought? Answer: "))
//!     .max_tokens(300)
//!     .build();
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.content);
//! # Ok(())
//! # }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, StopReason,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Hugging Face provider
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Access token; public models work without one at a lower rate limit
    pub api_token: Option<String>,

    /// Base URL, the model id is appended as a path segment
    pub api_base: String,

    /// Request timeout in seconds (default: 120)
    pub timeout_secs: u64,

    /// Block until a cold model has loaded instead of failing with 503
    pub wait_for_model: bool,
}

impl HuggingFaceConfig {
    /// Create a config with default settings and no token
    pub fn new() -> Self {
        Self {
            api_token: None,
            api_base: DEFAULT_HF_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            wait_for_model: true,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads the token from `HF_API_TOKEN` and the base URL from
    /// `HF_API_BASE`, both optional.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        config.api_token = std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty());
        if let Ok(base) = std::env::var("HF_API_BASE") {
            config.api_base = base;
        }
        config
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set whether to wait for cold models
    pub fn with_wait_for_model(mut self, wait: bool) -> Self {
        self.wait_for_model = wait;
        self
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hugging Face text2text provider
pub struct HuggingFaceProvider {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: HuggingFaceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(HuggingFaceConfig::from_env())
    }

    /// Get the current configuration
    pub fn config(&self) -> &HuggingFaceConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl LLMProvider for HuggingFaceProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        if request.model.is_empty() {
            return Err(LLMError::InvalidRequest("model id is empty".to_string()));
        }

        let body = build_request(&request, self.config.wait_for_model);
        let url = self.endpoint(&request.model);
        debug!("Sending request to {url} ({} chars)", body.inputs.len());

        let mut builder = self.client.post(&url).json(&body);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(LLMError::from_status(status, error_text, &request.model));
        }

        let raw: HfResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;
        let text = raw.into_text()?;
        debug!("Received {} chars", text.len());

        Ok(CompletionResponse {
            message: Message::assistant(text),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

// Inference API request/response types

#[derive(Debug, Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_beams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    no_repeat_ngram_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    early_stopping: Option<bool>,
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
    use_cache: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HfResponse {
    Batch(Vec<HfGeneration>),
    Single(HfGeneration),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct HfGeneration {
    generated_text: String,
}

impl HfResponse {
    fn into_text(self) -> Result<String> {
        match self {
            HfResponse::Batch(generations) => generations
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| {
                    LLMError::UnexpectedResponse("No generations in response".to_string())
                }),
            HfResponse::Single(generation) => Ok(generation.generated_text),
            HfResponse::Error { error } => Err(LLMError::RequestFailed(error)),
        }
    }
}

fn build_request(request: &CompletionRequest, wait_for_model: bool) -> HfRequest {
    let generation = &request.generation;
    HfRequest {
        inputs: request.prompt_text(),
        parameters: HfParameters {
            max_length: request.max_tokens,
            temperature: request.temperature,
            num_beams: generation.num_beams,
            top_p: generation.top_p,
            top_k: generation.top_k,
            no_repeat_ngram_size: generation.no_repeat_ngram_size,
            early_stopping: generation.early_stopping,
        },
        options: HfOptions {
            wait_for_model,
            use_cache: false,
        },
    }
}
