//! CLI error type.

use std::fmt;
use std::io;

use blobsite::config::ConfigFileError;
use blobsite::gateway::GatewayError;
use blobsite::logging::LoggingError;
use blobsite::transport::TransportError;

/// Anything that ends a CLI command with a non-zero exit.
#[derive(Debug)]
pub enum CliError {
    /// Settings are missing or contradictory.
    Config(String),
    ConfigFile(ConfigFileError),
    Logging(LoggingError),
    /// HTTP client could not be created.
    Transport(TransportError),
    Gateway(GatewayError),
    /// Server bind or runtime failure.
    Server(String),
    Output(io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::Logging(e) => write!(f, "Logging setup failed: {}", e),
            CliError::Transport(e) => write!(f, "HTTP client error: {}", e),
            CliError::Gateway(e) => write!(f, "{}", e),
            CliError::Server(msg) => write!(f, "Server error: {}", msg),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Transport(e) => Some(e),
            CliError::Gateway(e) => Some(e),
            CliError::Output(e) => Some(e),
            CliError::Config(_) | CliError::Server(_) => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Transport(e)
    }
}

impl From<GatewayError> for CliError {
    fn from(e: GatewayError) -> Self {
        CliError::Gateway(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Output(e)
    }
}
