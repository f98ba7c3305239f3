//! Shopfront terminal storefront

use std::process;

use shopfront::observability;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
