use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use spreadvault::adapter::inbound::cli::command::{Cli, Commands};
use spreadvault::adapter::inbound::cli::{settle, watch};
use spreadvault::infrastructure::config::settings::Config;
use spreadvault::infrastructure::operator::Operator;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Fatal error");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json_logs {
        config.logging.format = "json".into();
    }
    config.init_logging();
    info!("spreadvault starting");

    let operator = Operator::new(config);

    match cli.command {
        Commands::Watch(args) => {
            watch::execute(&operator, &args).await?;
        }
        Commands::Settle(args) => {
            let record = settle::execute(&operator, &args).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            if !settle::succeeded(&record) {
                anyhow::bail!(
                    "settlement not completed: {}",
                    record.error.as_deref().unwrap_or("unknown reason")
                );
            }
        }
    }

    info!("spreadvault stopped");
    Ok(())
}
