//! Narrative generation through a pluggable text-generation provider

pub mod prompt;

pub use prompt::{render_prompt, truncate_tokens};

use std::sync::Arc;
use std::time::Duration;

use insight_llm::providers::{
    HuggingFaceConfig, HuggingFaceProvider, OpenAIConfig, OpenAIProvider,
};
use insight_llm::{CompletionRequest, LLMProvider, Message};
use tracing::{debug, info, instrument, warn};

use crate::analysis::{DerivedMetrics, Insights};
use crate::config::{DecodingConfig, InsightConfig, NarrativeBackend};
use crate::data::QuoteRecord;
use crate::error::{InsightError, Result};

/// Requests a narrative for one analyzed quote
#[derive(Clone)]
pub struct Narrator {
    provider: Arc<dyn LLMProvider>,
    model: String,
    decoding: DecodingConfig,
    timeout: Duration,
}

impl Narrator {
    /// Create a narrator with the default decoding settings
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            decoding: DecodingConfig::default(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Create a narrator for the configured backend
    pub fn from_config(config: &InsightConfig) -> Result<Self> {
        let provider = build_provider(config)?;
        Ok(Self::new(provider, config.model.clone())
            .with_decoding(config.decoding.clone())
            .with_timeout(config.narrative_timeout))
    }

    pub fn with_decoding(mut self, decoding: DecodingConfig) -> Self {
        self.decoding = decoding;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Build the completion request for a prompt
    ///
    /// The prompt is cut to the configured input token budget first.
    pub fn request(&self, prompt: &str) -> CompletionRequest {
        let prompt = truncate_tokens(prompt, self.decoding.max_input_tokens);
        CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt))
            .max_tokens(self.decoding.max_output_tokens)
            .temperature(self.decoding.temperature)
            .generation(self.decoding.generation_params())
            .build()
    }

    /// Generate the narrative for one quote
    #[instrument(skip_all, fields(symbol = %record.symbol, provider = self.provider.name()))]
    pub async fn narrate(
        &self,
        record: &QuoteRecord,
        metrics: &DerivedMetrics,
        insights: &Insights,
    ) -> Result<String> {
        let prompt = render_prompt(record, metrics, insights)?;
        self.generate(&prompt).await
    }

    /// Send a rendered prompt and return the generated text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let request = self.request(prompt);
        debug!(
            "Requesting narrative from {} (model: {}, max_tokens: {})",
            self.provider.name(),
            request.model,
            request.max_tokens
        );

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                warn!("Narrative request timed out after {:?}", self.timeout);
                InsightError::GenerationFailure(format!(
                    "timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        let text = response
            .message
            .text()
            .map(str::trim)
            .ok_or_else(|| InsightError::GenerationFailure("model returned no text".to_string()))?;

        debug!(
            "Narrative received ({} chars, {} tokens)",
            text.len(),
            response.usage.total()
        );
        Ok(text.to_string())
    }
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Construct the provider for the configured backend
pub fn build_provider(config: &InsightConfig) -> Result<Arc<dyn LLMProvider>> {
    let timeout_secs = config.narrative_timeout.as_secs().max(1);

    let provider: Arc<dyn LLMProvider> = match config.backend {
        NarrativeBackend::HuggingFace => {
            let mut hf = HuggingFaceConfig::new().with_timeout(timeout_secs);
            if let Some(token) = &config.api_key {
                hf = hf.with_token(token);
            }
            if let Some(base) = &config.api_base {
                hf = hf.with_api_base(base);
            }
            Arc::new(HuggingFaceProvider::with_config(hf).map_err(config_error)?)
        }
        NarrativeBackend::OpenAI => {
            let mut openai = OpenAIConfig::new(config.api_key.clone().unwrap_or_default())
                .with_timeout(timeout_secs);
            if let Some(base) = &config.api_base {
                openai = openai.with_api_base(base);
            }
            Arc::new(OpenAIProvider::with_config(openai).map_err(config_error)?)
        }
    };

    info!(
        "Narrative backend: {} (model: {})",
        provider.name(),
        config.model
    );
    Ok(provider)
}

fn config_error(err: insight_llm::LLMError) -> InsightError {
    InsightError::Config(format!("narrative provider: {err}"))
}
