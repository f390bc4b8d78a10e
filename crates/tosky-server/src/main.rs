mod layout;
mod logging;
mod routes;
mod serve;
mod server_utils;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::error;

use tosky::SiteConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the site server
    Serve {
        /// Path to the site configuration file
        #[arg(long, default_value = "site.toml")]
        config: PathBuf,
        /// Expose the server to the network instead of localhost only
        #[arg(long)]
        host: bool,
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
        /// Suppress log output
        #[arg(long)]
        quiet: bool,
    },
    /// Validate the site configuration and exit
    Check {
        /// Path to the site configuration file
        #[arg(long, default_value = "site.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let start_time = std::time::Instant::now();
    let cli = Cli::parse();

    logging::init_logging();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            quiet: _,
        } => {
            let mut config = match SiteConfig::load(&config) {
                Ok(config) => config,
                Err(err) => {
                    error!(name: "config", "{}", err);
                    return ExitCode::FAILURE;
                }
            };

            if let Some(port) = port {
                config.server.port = port;
            }

            serve::start_server(config, host, start_time).await;
            ExitCode::SUCCESS
        }
        Commands::Check { config: path } => match SiteConfig::load(&path) {
            Ok(_) => {
                println!("{} is valid.", path.display().to_string().green());
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(name: "config", "{}", err);
                ExitCode::FAILURE
            }
        },
    }
}
