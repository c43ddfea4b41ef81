//! Resolve command - fetch one site path directly.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use super::common::{build_runtime, load_config, load_site, start_logging};
use crate::error::CliError;

/// Arguments for the resolve command.
pub struct ResolveArgs {
    pub path: String,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

/// Run the resolve command.
///
/// Content goes to `--output` or stdout; the content type goes to stderr
/// so it never mixes with piped bytes.
pub async fn run(args: ResolveArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let _log_guard = start_logging(&config, args.verbose)?;

    // Direct lookups never consult the response cache.
    let runtime = build_runtime(&config, false).await?;
    load_site(&runtime.gateway, &config)?;

    let response = runtime.gateway.resolve(&args.path).await?;

    match &args.output {
        Some(path) => {
            fs::write(path, &response.body)?;
            eprintln!(
                "{} ({} bytes) -> {}",
                response.content_type,
                response.body.len(),
                path.display()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.body)?;
            stdout.flush()?;
            eprintln!("{} ({} bytes)", response.content_type, response.body.len());
        }
    }

    Ok(())
}
