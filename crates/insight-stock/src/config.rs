//! Configuration for snapshot fetching and narrative generation

use crate::error::{InsightError, Result};
use insight_llm::GenerationParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Text-generation backend used for narratives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeBackend {
    /// Hugging Face text2text endpoint (default)
    #[default]
    HuggingFace,
    /// OpenAI-compatible chat endpoint
    OpenAI,
}

impl std::str::FromStr for NarrativeBackend {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "openai" => Ok(Self::OpenAI),
            other => Err(InsightError::Config(format!(
                "unknown narrative backend '{other}' (expected huggingface or openai)"
            ))),
        }
    }
}

/// Fixed decoding configuration for the narrative model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodingConfig {
    pub num_beams: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub no_repeat_ngram_size: u32,
    /// Maximum generated tokens
    pub max_output_tokens: usize,
    /// Prompts are cut to this many whitespace-delimited tokens
    pub max_input_tokens: usize,
    pub early_stopping: bool,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            num_beams: 5,
            temperature: 0.7,
            top_p: 0.95,
            top_k: 50,
            no_repeat_ngram_size: 3,
            max_output_tokens: 300,
            max_input_tokens: 512,
            early_stopping: true,
        }
    }
}

impl DecodingConfig {
    /// Provider-level parameters for this configuration
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            num_beams: Some(self.num_beams),
            top_p: Some(self.top_p),
            top_k: Some(self.top_k),
            no_repeat_ngram_size: Some(self.no_repeat_ngram_size),
            early_stopping: Some(self.early_stopping),
        }
    }
}

/// Configuration for the insight pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Index whose constituents are fetched
    pub index: String,

    /// Exchange site root, also used to prime the session cookies
    pub nse_base_url: String,

    /// Request timeout for the snapshot fetch
    pub request_timeout: Duration,

    /// Raw snapshot JSON written by `fetch`
    pub snapshot_path: PathBuf,

    /// Normalized CSV dataset written by `format` and read at startup
    pub dataset_path: PathBuf,

    /// Narrative backend
    pub backend: NarrativeBackend,

    /// Model identifier passed to the backend
    pub model: String,

    /// Backend base URL; `None` uses the provider default
    pub api_base: Option<String>,

    /// Backend credential (HF token or OpenAI key)
    pub api_key: Option<String>,

    /// Upper bound on one narrative call
    pub narrative_timeout: Duration,

    /// Decoding parameters for the narrative model
    pub decoding: DecodingConfig,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            index: "NIFTY 50".to_string(),
            nse_base_url: "https://www.nseindia.com".to_string(),
            request_timeout: Duration::from_secs(30),
            snapshot_path: PathBuf::from("stock_data.json"),
            dataset_path: PathBuf::from("stock_data.csv"),
            backend: NarrativeBackend::HuggingFace,
            model: "AventIQ-AI/t5-stockmarket-qa-chatbot".to_string(),
            api_base: None,
            api_key: None,
            narrative_timeout: Duration::from_secs(120),
            decoding: DecodingConfig::default(),
        }
    }
}

impl InsightConfig {
    /// Create a new configuration builder
    pub fn builder() -> InsightConfigBuilder {
        InsightConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.index.trim().is_empty() {
            return Err(InsightError::Config("index must not be empty".to_string()));
        }

        if self.model.trim().is_empty() {
            return Err(InsightError::Config("model must not be empty".to_string()));
        }

        if self.request_timeout.is_zero() || self.narrative_timeout.is_zero() {
            return Err(InsightError::Config(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        let decoding = &self.decoding;
        if decoding.num_beams == 0
            || decoding.max_output_tokens == 0
            || decoding.max_input_tokens == 0
        {
            return Err(InsightError::Config(
                "num_beams, max_output_tokens and max_input_tokens must be greater than 0"
                    .to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&decoding.temperature) {
            return Err(InsightError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                decoding.temperature
            )));
        }

        if !(decoding.top_p > 0.0 && decoding.top_p <= 1.0) {
            return Err(InsightError::Config(format!(
                "top_p must be within (0.0, 1.0], got {}",
                decoding.top_p
            )));
        }

        Ok(())
    }
}

/// Builder for InsightConfig
#[derive(Debug, Default)]
pub struct InsightConfigBuilder {
    index: Option<String>,
    nse_base_url: Option<String>,
    request_timeout: Option<Duration>,
    snapshot_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    backend: Option<NarrativeBackend>,
    model: Option<String>,
    api_base: Option<String>,
    api_key: Option<String>,
    narrative_timeout: Option<Duration>,
    decoding: Option<DecodingConfig>,
    env_error: Option<String>,
    hf_token_env: Option<String>,
    openai_key_env: Option<String>,
}

impl InsightConfigBuilder {
    /// Set the index name
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Set the exchange site root
    pub fn nse_base_url(mut self, url: impl Into<String>) -> Self {
        self.nse_base_url = Some(url.into());
        self
    }

    /// Set the snapshot fetch timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the raw snapshot path
    pub fn snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    /// Set the CSV dataset path
    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// Set the narrative backend
    pub fn backend(mut self, backend: NarrativeBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the backend base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the backend credential
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the narrative timeout
    pub fn narrative_timeout(mut self, duration: Duration) -> Self {
        self.narrative_timeout = Some(duration);
        self
    }

    /// Set the decoding parameters
    pub fn decoding(mut self, decoding: DecodingConfig) -> Self {
        self.decoding = Some(decoding);
        self
    }

    /// Overlay settings from environment variables
    ///
    /// Unset or empty variables leave the builder untouched. An unparseable
    /// `NARRATIVE_BACKEND` or `NARRATIVE_TIMEOUT_SECS` is reported by `build`.
    /// `HF_API_TOKEN` and `OPENAI_API_KEY` are both captured; `build` picks the
    /// one matching the final backend.
    pub fn with_env(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(index) = var("NSE_INDEX") {
            self.index = Some(index);
        }
        if let Some(url) = var("NSE_BASE_URL") {
            self.nse_base_url = Some(url);
        }
        if let Some(path) = var("STOCK_DATA_JSON") {
            self.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(path) = var("STOCK_DATA_CSV") {
            self.dataset_path = Some(PathBuf::from(path));
        }
        if let Some(model) = var("NARRATIVE_MODEL") {
            self.model = Some(model);
        }
        if let Some(base) = var("NARRATIVE_API_BASE") {
            self.api_base = Some(base);
        }
        if let Some(backend) = var("NARRATIVE_BACKEND") {
            match backend.parse() {
                Ok(backend) => self.backend = Some(backend),
                Err(e) => self.env_error = Some(format!("NARRATIVE_BACKEND: {e}")),
            }
        }
        if let Some(secs) = var("NARRATIVE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.narrative_timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    self.env_error =
                        Some(format!("NARRATIVE_TIMEOUT_SECS is not a number: '{secs}'"));
                }
            }
        }

        self.hf_token_env = var("HF_API_TOKEN");
        self.openai_key_env = var("OPENAI_API_KEY");

        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<InsightConfig> {
        if let Some(err) = self.env_error {
            return Err(InsightError::Config(err));
        }

        let defaults = InsightConfig::default();
        let backend = self.backend.unwrap_or(defaults.backend);

        // An explicit key wins; otherwise take the environment key for the final backend
        let api_key = self.api_key.or(match backend {
            NarrativeBackend::HuggingFace => self.hf_token_env,
            NarrativeBackend::OpenAI => self.openai_key_env,
        });

        let config = InsightConfig {
            index: self.index.unwrap_or(defaults.index),
            nse_base_url: self.nse_base_url.unwrap_or(defaults.nse_base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            snapshot_path: self.snapshot_path.unwrap_or(defaults.snapshot_path),
            dataset_path: self.dataset_path.unwrap_or(defaults.dataset_path),
            backend,
            model: self.model.unwrap_or(defaults.model),
            api_base: self.api_base,
            api_key,
            narrative_timeout: self.narrative_timeout.unwrap_or(defaults.narrative_timeout),
            decoding: self.decoding.unwrap_or(defaults.decoding),
        };

        config.validate()?;
        Ok(config)
    }
}
