use anyhow::Result;
use clap::Parser;
use fit_client::cli::{handle_command, Cli};
use fit_client::config::Config;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for rendered results
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("fit_client=warn,fitcheck=warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    handle_command(cli, config).await
}
