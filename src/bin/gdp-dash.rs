use anyhow::{Context, Result};
use clap::Parser;
use gdp_dash::models::Dataset;
use gdp_dash::{loader, server};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// The dataset sits next to the binary's working directory, as the source
/// dashboard did; there are no other inputs.
const DATA_PATH: &str = "gdp_pcap.csv";
const PORT: u16 = 8050;

#[derive(Parser, Debug)]
#[command(
    name = "gdp-dash",
    version,
    about = "Serve a local GDP-per-capita dashboard from gdp_pcap.csv"
)]
struct Cli {
    /// Verbose logging (development mode).
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load once; any failure here is fatal and the server never starts.
    let table = loader::load_wide(DATA_PATH)
        .with_context(|| format!("loading dataset from {DATA_PATH}"))?;
    let data = Dataset::from_wide(&table).context("preparing dataset")?;
    info!(
        countries = data.countries.len(),
        years = format!("{}..={}", data.min_year, data.max_year),
        rows = data.records.len(),
        "dataset loaded"
    );

    let routes = server::routes(Arc::new(data));
    info!("dashboard on http://127.0.0.1:{PORT}/");
    warp::serve(routes).run(([127, 0, 0, 1], PORT)).await;

    Ok(())
}
