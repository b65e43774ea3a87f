//! Binary entry point: refresh the stored Dhan access token once and exit.

use std::sync::Arc;

use clap::Parser;

use dhan_token_agent::auth::{Handshake, HttpSessionFactory, InteractiveHandshake, SdkHandshake};
use dhan_token_agent::browser::WebDriverLauncher;
use dhan_token_agent::config::{RefreshConfig, StrategyKind};
use dhan_token_agent::consent::ConsentClient;
use dhan_token_agent::refresher::TokenRefresher;
use dhan_token_agent::secrets::ssm::SsmParameterStore;
use dhan_token_agent::util::retry::FixedRetry;

/// Refresh the stored Dhan access token by replaying the login handshake.
#[derive(Debug, Parser)]
#[command(name = "dhan-token-agent", version, about)]
struct Cli {
    /// Handshake strategy override: 'interactive' or 'sdk'.
    #[arg(long)]
    strategy: Option<String>,
    /// AWS region override for the parameter store.
    #[arg(long)]
    region: Option<String>,
    /// WebDriver endpoint for the interactive strategy.
    #[arg(long)]
    webdriver_url: Option<String>,
    /// Maximum token-generation attempts for the sdk strategy.
    #[arg(long)]
    max_retries: Option<u32>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dhan_token_agent=info".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RefreshConfig::from_env();
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.parse::<StrategyKind>()?;
    }
    if let Some(region) = cli.region {
        config.aws_region = region;
    }
    if let Some(url) = cli.webdriver_url {
        config.webdriver_url = url;
    }
    if let Some(max_retries) = cli.max_retries {
        config.max_retries = max_retries;
    }

    let store = Arc::new(SsmParameterStore::connect(config.aws_region.clone()).await);

    let handshake: Box<dyn Handshake> = match config.strategy {
        StrategyKind::Interactive => {
            let consent = ConsentClient::with_base_url(config.auth_base_url.clone());
            let launcher = Box::new(WebDriverLauncher::new(config.webdriver_url.clone()));
            Box::new(InteractiveHandshake::new(consent, launcher))
        }
        StrategyKind::Sdk => {
            let factory = Box::new(HttpSessionFactory::with_base_url(
                config.auth_base_url.clone(),
            ));
            let retry = FixedRetry {
                max_attempts: config.max_retries,
                delay: config.retry_delay,
            };
            Box::new(SdkHandshake::new(factory).with_retry(retry))
        }
    };

    let refresher = TokenRefresher::new(store, handshake, config.keys.clone());
    refresher.run().await?;

    println!("✅ Dhan access token updated");
    Ok(())
}
