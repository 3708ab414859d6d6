mod config;
mod ledger;
mod models;
mod report;
mod run;
mod status;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, rest) = config::Config::from_args(&args)?;
    run::as_cli(&rest, &config)
}
