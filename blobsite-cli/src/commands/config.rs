//! Configuration CLI commands.
//!
//! Provides `config get`, `config list`, and `config path` for viewing the
//! effective settings.

use std::path::PathBuf;

use blobsite::config::{config_file_path, ConfigFile, ConfigKey};
use clap::Subcommand;

use super::common::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., gateway.endpoints)
        key: String,

        /// Config file (default: platform config dir/blobsite/config.ini)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// List all configuration settings
    List {
        /// Config file (default: platform config dir/blobsite/config.ini)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key, config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", run_get(&key, &config)?);
            Ok(())
        }
        ConfigCommands::List { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", render_list(&config));
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
    }
}

fn run_get(key: &str, config: &ConfigFile) -> Result<String, CliError> {
    let config_key: ConfigKey = key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'blobsite config list' to see available keys.",
            key
        ))
    })?;

    let value = config_key.get(config);
    Ok(if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    })
}

fn render_list(config: &ConfigFile) -> String {
    let mut out = String::new();
    out.push_str("Configuration Settings\n");
    out.push_str("======================\n");

    let mut current_section = "";
    for key in ConfigKey::all() {
        let section = key.section();

        // Section header when section changes
        if section != current_section {
            out.push_str(&format!("\n[{}]\n", section));
            current_section = section;
        }

        let value = key.get(config);
        let value = if value.is_empty() { "(not set)" } else { &value };
        out.push_str(&format!("  {} = {}\n", key.key_name(), value));
    }
    out
}
