// File: manager/src/main.rs
use ambari_client::AmbariClient;
use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use ambari_manager::cli::Cli;
use ambari_manager::commands;
use ambari_manager::config::ConfigManager;
use ambari_manager::inventory::ConfiguredEndpoint;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output on stdout stays parseable
    let env_filter = EnvFilter::from_default_env()
        .add_directive("ambari_manager=info".parse()?)
        .add_directive("ambari_client=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_manager = ConfigManager::new(cli.config_dir.to_string_lossy().to_string()).await?;
    let config = config_manager.get_current_config();

    let endpoint = ConfiguredEndpoint::new(&config);
    let cancel = CancellationToken::new();
    let client = AmbariClient::new(&endpoint, config.client_options())?.with_cancellation(cancel.clone());
    info!("Connected to Ambari at {}", client.base_url());

    // Ctrl-C aborts the running command, including any request wait
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the running command");
            signal_token.cancel();
        }
    });

    let output = commands::execute_cancellable(&client, &config, cli.command, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
