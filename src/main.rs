use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use threadline::config::LlmConfig;
use threadline::history::HistoryStore;
use threadline::llm::OpenAiResponsesClient;
use threadline::run::run_once;

/// Ask one question and thread it into the ongoing conversation.
#[derive(Parser, Debug)]
#[command(name = "threadline", version, about)]
struct Cli {
    /// File holding the question to send
    #[arg(long, default_value = "request.txt")]
    request: PathBuf,

    /// File overwritten with the latest answer
    #[arg(long, default_value = "response.txt")]
    response: PathBuf,

    /// Append-only JSONL log of every exchange
    #[arg(long, default_value = "history/history.jsonl")]
    history: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threadline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = LlmConfig::from_env()?;
    let client = OpenAiResponsesClient::new(config);
    let store = HistoryStore::new(&cli.history);

    run_once(&cli.request, &cli.response, &store, &client).await?;

    println!("Wrote {}", cli.response.display());
    println!("Appended {}", store.path().display());

    Ok(())
}
