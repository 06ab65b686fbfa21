//! Command-line access to the answer pipeline
//!
//! Run with: cargo run -p grounded-rag --features cli --bin grounded-rag -- ask "question"

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use grounded_rag::{providers, AnswerPipeline, ErrorCategory, RagConfig};

#[derive(Parser)]
#[command(name = "grounded-rag", version, about = "Grounded answers with source citations")]
struct Cli {
    /// TOML config file (defaults to environment / .env)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a question from the index
    Ask {
        /// The question
        question: String,
    },
    /// Check that the search and generation backends are reachable
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grounded_rag=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::from_env()?,
    };

    let (search, llm) = providers::from_config(&config)?;
    let pipeline = AnswerPipeline::new(&config, search, llm);

    match cli.command {
        Command::Ask { question } => match pipeline.answer(&question).await {
            Ok(result) => {
                println!("{}", result.answer);
                println!();
                println!("Sources:");
                for source in result.sources.iter() {
                    println!("  - {}", source);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) if e.category() == ErrorCategory::Infrastructure => Err(e.into()),
            Err(e) => {
                eprintln!("No answer: {}", e);
                Ok(ExitCode::from(2))
            }
        },
        Command::Check => {
            let (search_ok, llm_ok) = pipeline.health().await;
            let (search_name, llm_name) = pipeline.backend_names();
            println!("{:<10} {}", search_name, if search_ok { "ok" } else { "FAILED" });
            println!("{:<10} {}", llm_name, if llm_ok { "ok" } else { "FAILED" });
            Ok(if search_ok && llm_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
