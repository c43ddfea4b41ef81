//! Blobsite CLI - serve a site out of blob storage
//!
//! ```text
//! blobsite serve [--config PATH] [--bind ADDR] [--no-cache]
//! blobsite resolve <PATH> [--config PATH] [--output FILE]
//! blobsite config path|list|get <KEY>
//! ```

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "blobsite")]
#[command(version = blobsite::VERSION)]
#[command(about = "Serve a static site straight out of content-addressed blob storage", long_about = None)]
struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an HTTP server that answers from the site registry
    Serve {
        /// Config file (default: platform config dir/blobsite/config.ini)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Address to listen on, overriding [server] bind
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Disable the response cache even if one is configured
        #[arg(long)]
        no_cache: bool,
    },

    /// Fetch a single site path and write its content
    Resolve {
        /// Site path, e.g. /index.html
        path: String,

        /// Config file (default: platform config dir/blobsite/config.ini)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Write content here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// View configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve {
            config,
            bind,
            no_cache,
        } => {
            commands::serve::run(commands::serve::ServeArgs {
                config,
                bind,
                no_cache,
                verbose: cli.verbose,
            })
            .await
        }
        Commands::Resolve {
            path,
            config,
            output,
        } => {
            commands::resolve::run(commands::resolve::ResolveArgs {
                path,
                config,
                output,
                verbose: cli.verbose,
            })
            .await
        }
        Commands::Config { command } => commands::config::run(command),
    }
}
