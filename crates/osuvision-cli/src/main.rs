use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod shutdown;

#[derive(Parser)]
#[command(name = "osuvision")]
#[command(about = "Read live state out of a running osu! stable client")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "OSUVISION_CONFIG")]
    config: Option<PathBuf>,

    /// Signature descriptor (JSON)
    #[arg(short, long)]
    signatures: Option<PathBuf>,

    /// Target process name
    #[arg(short, long)]
    process: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan for every signature and print the address table
    Scan {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,

        /// Also print region statistics for the target
        #[arg(long)]
        regions: bool,
    },
    /// Poll the client and print its state whenever it changes
    Watch {
        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Print snapshots of the client state as JSON lines
    Snapshot {
        /// Number of snapshots to take
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Delay between snapshots in milliseconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Dump raw bytes of the target's memory
    Hexdump {
        /// Start address (hex)
        address: String,

        /// Number of bytes (at most 1 MiB)
        #[arg(default_value_t = 256)]
        size: usize,

        /// Hide the ASCII column
        #[arg(long)]
        no_ascii: bool,
    },
    /// Walk a pointer chain step by step
    Chain {
        /// Signature name or hex address to start from
        base: String,

        /// Offsets (hex, may be negative: -0xC)
        #[arg(allow_hyphen_values = true)]
        offsets: Vec<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "osuvision=debug"
    } else {
        "osuvision=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    let mut config = config::load(args.config.as_deref())?;
    config::apply_overrides(&mut config, args.signatures, args.process);
    debug!("Effective config: {:?}", config);

    match args.command {
        Command::Scan { json, regions } => commands::scan::run(&config, json, regions),
        Command::Watch { interval } => commands::watch::run(&config, interval),
        Command::Snapshot { count, interval } => commands::snapshot::run(&config, count, interval),
        Command::Hexdump {
            address,
            size,
            no_ascii,
        } => commands::hexdump::run(&config, &address, size, !no_ascii),
        Command::Chain { base, offsets } => commands::chain::run(&config, &base, &offsets),
    }
}
