use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ragchat::connector::api::{Container, ContainerConfig, Router};
use ragchat::Commands;

#[derive(Parser)]
#[command(name = "ragchat")]
#[command(author, version, about = "Chat grounded on an Azure AI Search index", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON settings file (OpenAIEndpoint, SearchIndexName, ...), default ./appsettings.json if present;
    /// environment variables override it
    #[arg(short, long, global = true)]
    settings: Option<String>,

    /// Answer from an offline mock instead of the hosted service
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true, default_value = "120")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        settings_file: cli.settings,
        mock: cli.mock,
        timeout_secs: cli.timeout_secs,
    })?;

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
