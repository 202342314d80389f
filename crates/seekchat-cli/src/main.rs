//! seekchat - replay scripted chat interactions

mod cli;
mod script;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ReplayArgs};
use script::{LogObserver, Script};
use seekchat_core::{ChatSession, MemoryTranscript, SessionConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::load_or_default(),
    };
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Replay(args) => replay(args, config),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Log to stderr so replay output on stdout stays machine-readable
fn init_logging(config: &SessionConfig, verbose: bool) {
    let default_filter = if verbose { "debug" } else { config.log_filter.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn replay(args: ReplayArgs, config: SessionConfig) -> Result<()> {
    let script = Script::load(&args.script)?;

    let transcript = Arc::new(MemoryTranscript::new(script.items.clone()));
    let session = ChatSession::new(config, transcript.clone());
    let observer = Arc::new(LogObserver);
    session.selection().lock().add_observer(&observer);

    for report in script::replay(&script, &session, &transcript)? {
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}", report);
        }
    }
    Ok(())
}
