//! Command-line entry point: rank every DCA schedule over a price file

use clap::Parser;
use dca_trade::config::RunConfig;
use dca_trade::driver::run;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dca_trade=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RunConfig::parse();

    match run(&config) {
        Ok(summary) => {
            if let Some(best) = summary.table.best() {
                info!(
                    strategy = %best.strategy,
                    avg_price = best.avg_price,
                    results = %summary.results_path.display(),
                    "done"
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
