//! Reelsmith CLI binary.
//!
//! This binary provides command-line access to Reelsmith's pipeline:
//! - Recover JSON and story bibles from raw model replies
//! - Schedule events and generate episode architectures
//! - Storyboard scripted episodes into timed image prompts

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Session};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for JSON output
    let directive = if cli.verbose { "debug" } else { "info" };
    if cli.telemetry {
        reelsmith::init_telemetry(directive)?;
    } else {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let session = Session::open(cli.config.as_deref(), cli.replay.as_deref())?;
    let result = session.run(cli.command).await;

    if cli.telemetry {
        reelsmith::shutdown_telemetry();
    }
    result?;
    Ok(())
}
