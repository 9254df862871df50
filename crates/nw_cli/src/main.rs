use anyhow::Context;
use clap::Parser;
use nw_core::logging::init_logging;
use nw_core::NewsConfig;
use nw_fetchers::{Aggregator, FetchOutcome};
use nw_web::handlers::NewsEnvelope;
use nw_web::AppState;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-source news aggregation service", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the aggregate endpoint over HTTP
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, short, default_value_t = 3000)]
        port: u16,
    },
    /// Run the pipeline once and print the JSON envelope
    Fetch {
        #[arg(long)]
        pretty: bool,
    },
    /// List providers in declared order and whether they are configured
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = Arc::new(NewsConfig::from_env());
    let aggregator = Aggregator::new(config.clone()).context("failed to build HTTP client")?;
    let enabled: Vec<_> = aggregator
        .fetchers()
        .iter()
        .filter(|f| f.is_enabled(&config))
        .map(|f| f.name())
        .collect();
    info!("📰 Providers enabled: {}", enabled.join(", "));

    match cli.command {
        Commands::Serve { host, port } => {
            let addr = SocketAddr::new(host, port);
            nw_web::serve(addr, AppState::new(Arc::new(aggregator)))
                .await
                .with_context(|| format!("server on {} stopped", addr))?;
        }
        Commands::Fetch { pretty } => {
            let reports = aggregator.fetch_all().await?;
            for report in &reports {
                match &report.outcome {
                    FetchOutcome::Items(items) => info!("✨ {}: {} articles", report.name, items.len()),
                    FetchOutcome::Disabled => info!("⏭️ {}: not configured", report.name),
                    FetchOutcome::Failed(reason) => info!("⚠️ {}: {}", report.name, reason),
                }
            }
            let data = nw_fetchers::pipeline::combine(
                reports.into_iter().map(|r| r.outcome.into_articles()),
            );
            let envelope = NewsEnvelope { data };
            let json = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            println!("{}", json);
        }
        Commands::Providers => {
            for fetcher in aggregator.fetchers() {
                let status = if fetcher.is_enabled(&config) { "enabled" } else { "disabled" };
                println!("{:<14} {}", fetcher.name(), status);
            }
        }
    }

    Ok(())
}
