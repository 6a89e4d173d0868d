//! Command parsing for the interactive session

use crate::error::{InsightError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Analyze one symbol
    Analyze { symbol: String },
    /// List stocks under the current industry filter
    List,
    /// List industries
    Industries,
    /// Set the industry filter; `"All"` clears it
    Filter { industry: String },
    /// Show help
    Help,
    /// Leave the session
    Exit,
}

impl Command {
    /// Parse a command from user input
    ///
    /// Input without a leading `/` is a symbol to analyze. Symbols may contain
    /// spaces (`NIFTY 50`) and are upper-cased.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(InsightError::Command("Empty input".to_string()));
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Analyze {
                symbol: normalize_symbol(input),
            });
        };

        let (cmd, args) = match rest.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (rest, ""),
        };
        if cmd.is_empty() {
            return Err(InsightError::Command("Empty command".to_string()));
        }

        match cmd.to_lowercase().as_str() {
            "analyze" | "a" => {
                if args.is_empty() {
                    return Err(InsightError::Command(
                        "Missing symbol for analyze command".to_string(),
                    ));
                }
                Ok(Command::Analyze {
                    symbol: normalize_symbol(args),
                })
            }
            "list" | "ls" | "l" => Ok(Command::List),
            "industries" | "i" => Ok(Command::Industries),
            "filter" | "f" => {
                if args.is_empty() {
                    return Err(InsightError::Command(
                        "Missing industry for filter command (use All to clear)".to_string(),
                    ));
                }
                Ok(Command::Filter {
                    industry: args.to_string(),
                })
            }
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            other => Err(InsightError::Command(format!("Unknown command: {other}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Stock Insight Commands
======================

  /analyze <symbol>     Analyze a stock (or just type the symbol)
  /list                 List stocks under the current industry filter
  /industries           List industries
  /filter <industry>    Filter stocks by industry (All clears the filter)
  /help                 Show help
  /exit                 Exit

Aliases:
  /a = /analyze   /ls = /list   /i = /industries   /f = /filter   /q = /exit
"
    }
}

fn normalize_symbol(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
