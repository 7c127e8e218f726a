//! Hivefront - Serve Hive community posts, articles and profiles as HTML
//!
//! Fetches content from public Hive API nodes, caches it in memory, and
//! renders it to HTML for direct browser consumption.

use clap::Parser;

use hivefront::cli::{Cli, ServerConfig};

/// Sets up logging with `info` as the default level, overridable via `RUST_LOG`
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match ServerConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    setup_logging();

    hivefront::web::start_server(config).await?;

    Ok(())
}
