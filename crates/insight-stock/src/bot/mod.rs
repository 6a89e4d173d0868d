//! Interactive stock insight session
//!
//! A line-oriented front end over [`AnalysisEngine`]: pick an industry, list
//! its stocks and analyze a symbol.
//!
//! ```rust,ignore
//! use insight_stock::bot::{BotConfig, InsightBot, Reply};
//!
//! let mut bot = InsightBot::new(engine, BotConfig::default());
//! match bot.process_input("/analyze INFY").await? {
//!     Reply::Text(text) => println!("{text}"),
//!     Reply::Exit => {}
//! }
//! ```

pub mod commands;

use tracing::debug;

use crate::data::ALL_INDUSTRIES;
use crate::engine::AnalysisEngine;
use crate::error::{InsightError, Result};
use crate::interface::{render_industries, render_outcome, render_quote_list};

pub use commands::Command;

/// Configuration for the interactive session
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Welcome message
    pub welcome_message: String,
    /// Prompt prefix
    pub prompt: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            welcome_message: "📈 Stock Market Agent - type /help for commands".to_string(),
            prompt: ">>> ".to_string(),
        }
    }
}

impl BotConfig {
    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    welcome_message: Option<String>,
    prompt: Option<String>,
}

impl BotConfigBuilder {
    /// Set welcome message
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    /// Set prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BotConfig {
        let defaults = BotConfig::default();
        BotConfig {
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
        }
    }
}

/// What the session wants printed next
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Exit,
}

/// Interactive session state
pub struct InsightBot {
    engine: AnalysisEngine,
    industry: String,
    config: BotConfig,
}

impl InsightBot {
    pub fn new(engine: AnalysisEngine, config: BotConfig) -> Self {
        Self {
            engine,
            industry: ALL_INDUSTRIES.to_string(),
            config,
        }
    }

    /// Get the welcome message
    pub fn welcome(&self) -> &str {
        &self.config.welcome_message
    }

    /// Get the prompt
    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    /// Current industry filter
    pub fn industry(&self) -> &str {
        &self.industry
    }

    /// Process user input and return a reply
    pub async fn process_input(&mut self, input: &str) -> Result<Reply> {
        let command = Command::parse(input)?;
        self.execute_command(command).await
    }

    /// Execute a parsed command
    pub async fn execute_command(&mut self, command: Command) -> Result<Reply> {
        debug!("Executing {command:?}");
        let text = match command {
            Command::Analyze { symbol } => render_outcome(&self.engine.analyze(&symbol).await),
            Command::List => {
                let dataset = self.engine.dataset();
                let records = dataset.filter_by_industry(&self.industry);
                format!(
                    "Filter: {}\n{}",
                    self.industry,
                    render_quote_list(dataset, &records)
                )
            }
            Command::Industries => render_industries(self.engine.dataset()),
            Command::Filter { industry } => {
                let resolved = self.resolve_industry(&industry)?;
                self.industry = resolved;
                format!("Industry filter set to {}", self.industry)
            }
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Text(text))
    }

    /// Match an industry name case-insensitively against the dataset
    fn resolve_industry(&self, requested: &str) -> Result<String> {
        if requested.eq_ignore_ascii_case(ALL_INDUSTRIES) {
            return Ok(ALL_INDUSTRIES.to_string());
        }
        self.engine
            .dataset()
            .industries()
            .into_iter()
            .find(|known| known.eq_ignore_ascii_case(requested))
            .map(str::to_string)
            .ok_or_else(|| {
                InsightError::Command(format!(
                    "Unknown industry: {requested} (see /industries)"
                ))
            })
    }
}
