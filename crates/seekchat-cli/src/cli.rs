use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seekchat")]
#[command(version, about = "Replay chat interactions through the seekchat event chain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Session config file (defaults to <config dir>/seekchat/config.toml)
    #[arg(long, global = true, env = "SEEKCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a TOML interaction script
    Replay(ReplayArgs),

    /// Print the effective session config
    Config,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Script with [[item]] and [[step]] tables
    pub script: PathBuf,

    /// Print one JSON object per step
    #[arg(long)]
    pub json: bool,
}
