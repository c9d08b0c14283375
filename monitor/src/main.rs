use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use monitor::constants::defaults;
use monitor::{ConfigManager, HealthScheduler};

/// Watches a CometBFT node and reports health changes to Telegram or a webhook
#[derive(Debug, Parser)]
#[command(name = "node-monitor", version)]
struct Args {
    /// Path to the TOML (or .json) config file
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    config: PathBuf,

    /// Run a single tick and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("monitor=info".parse()?)
        .add_directive("node_monitor=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    info!("Starting node monitor");

    let config_manager = ConfigManager::new(&args.config).await?;
    let config = config_manager.get_current_config();

    let mut scheduler = HealthScheduler::from_config(&config)?;

    let dispatcher = scheduler.dispatcher().clone();
    if let Err(e) = dispatcher.verify().await {
        error!("Notification channel check failed: {}", e);
        return Err(anyhow!(
            "cannot establish {} notifier: {}",
            dispatcher.transport(),
            e
        ));
    }
    info!(
        "Alerts will be sent via {} to {}",
        dispatcher.transport(),
        dispatcher.destination()
    );

    if args.once {
        let report = scheduler.run_tick().await;
        for result in &report.results {
            info!("{}: {} ({})", result.check_name, result.status, result.detail);
        }
        if report.dispatch_failures > 0 {
            warn!("{} notifications could not be delivered", report.dispatch_failures);
        }
        return Ok(());
    }

    scheduler.run(shutdown_signal()).await;
    info!("Node monitor stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, finishing current tick");
}
