//! Stock Insight CLI
//!
//! Fetch an index snapshot, format it into the CSV dataset and analyze stocks.
//!
//! # Usage
//!
//! ```bash
//! # Download the NIFTY 50 snapshot and build the dataset
//! stock-insight fetch
//! stock-insight format
//!
//! # Analyze one stock, or start the interactive dashboard
//! export HF_API_TOKEN="hf_..."
//! stock-insight analyze INFY
//! stock-insight dashboard
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use insight_stock::bot::{BotConfig, InsightBot, Reply};
use insight_stock::interface::{render_industries, render_outcome, render_quote_list};
use insight_stock::{AnalysisEngine, Dataset, InsightConfig, Narrator, NseClient, api};
use insight_utils::LogFormat;
use tracing::info;

const PREVIEW_ROWS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "stock-insight")]
#[command(about = "Rule-based insights and generated narratives for index constituents", long_about = None)]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the index snapshot to the snapshot file
    Fetch {
        /// Index name (defaults to NSE_INDEX or NIFTY 50)
        #[arg(long)]
        index: Option<String>,
    },
    /// Normalize the snapshot file into the CSV dataset
    Format,
    /// List industries in the dataset
    Industries,
    /// List stocks, optionally for one industry
    List {
        #[arg(long)]
        industry: Option<String>,
    },
    /// Analyze one symbol
    Analyze {
        symbol: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive dashboard
    Dashboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    insight_utils::init_tracing_with(format, "warn,insight_stock=info,insight_llm=info");

    let config = InsightConfig::builder().with_env().build()?;

    match args.command {
        Commands::Fetch { index } => {
            let index = index.unwrap_or_else(|| config.index.clone());
            let client = NseClient::new(&config)?;
            client.fetch_to_file(&index, &config.snapshot_path).await?;
            println!(
                "Saved {index} snapshot to {}",
                config.snapshot_path.display()
            );
        }
        Commands::Format => {
            let snapshot = api::load_snapshot(&config.snapshot_path)?;
            let dataset = Dataset::from_snapshot(&snapshot)?;
            dataset.write_csv(&config.dataset_path)?;

            let preview: Vec<_> = dataset.records().iter().take(PREVIEW_ROWS).collect();
            println!("{}", render_quote_list(&dataset, &preview));
            println!(
                "Wrote {} rows to {}",
                dataset.len(),
                config.dataset_path.display()
            );
        }
        Commands::Industries => {
            let dataset = Dataset::load(&config.dataset_path);
            print!("{}", render_industries(&dataset));
        }
        Commands::List { industry } => {
            let dataset = Dataset::load(&config.dataset_path);
            let industry = industry.as_deref().unwrap_or(insight_stock::data::ALL_INDUSTRIES);
            let records = dataset.filter_by_industry(industry);
            println!("{}", render_quote_list(&dataset, &records));
        }
        Commands::Analyze { symbol, json } => {
            let engine = build_engine(&config)?;
            let outcome = engine.analyze(&symbol.trim().to_uppercase()).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", render_outcome(&outcome));
            }
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Dashboard => {
            let engine = build_engine(&config)?;
            run_repl(InsightBot::new(engine, BotConfig::default())).await?;
        }
    }

    Ok(())
}

fn build_engine(config: &InsightConfig) -> anyhow::Result<AnalysisEngine> {
    let dataset = Arc::new(Dataset::load(&config.dataset_path));
    let narrator = Narrator::from_config(config)?;
    info!(
        "Engine ready: {} quotes, narratives via {}",
        dataset.len(),
        narrator.provider_name()
    );
    Ok(AnalysisEngine::new(dataset, narrator))
}

async fn run_repl(mut bot: InsightBot) -> anyhow::Result<()> {
    println!("{}\n", bot.welcome());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match bot.process_input(input).await {
            Ok(Reply::Text(text)) => println!("{text}\n"),
            Ok(Reply::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
