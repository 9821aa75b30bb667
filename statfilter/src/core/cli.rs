use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_POOL_SIZE, ENV_STAT_ACCUM_CAPACITY, ENV_STAT_ACCUM_NAME};

#[derive(Parser)]
#[command(name = "statfilter")]
#[command(
    version,
    about = "Turn JSON event messages into statsd-style stats",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Name of the accumulator input stats are delivered to
    #[arg(long, global = true, env = ENV_STAT_ACCUM_NAME)]
    pub stat_accum_name: Option<String>,

    /// Capacity of the accumulator stat channel
    #[arg(long, global = true, env = ENV_STAT_ACCUM_CAPACITY)]
    pub stat_accum_capacity: Option<usize>,

    /// Number of messages allowed in flight
    #[arg(long, global = true, env = ENV_POOL_SIZE)]
    pub pool_size: Option<usize>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Read messages from stdin and write stats to stdout (default command)
    Run,
    /// Load and validate configuration, list metric templates, then exit
    Check,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub stat_accum_name: Option<String>,
    pub stat_accum_capacity: Option<usize>,
    pub pool_size: Option<usize>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        stat_accum_name: cli.stat_accum_name,
        stat_accum_capacity: cli.stat_accum_capacity,
        pool_size: cli.pool_size,
    };
    (config, cli.command)
}
