//! coinbars CLI - Bitcoin exchange market data as OHLCV bars.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinbars_lib::prelude::*;
use std::path::PathBuf;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "coinbars")]
#[command(about = "Bitcoin exchange market data as OHLCV bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Dataset cache directory. Defaults to the platform data directory.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Live feed address (host:port)
    #[arg(long, global = true)]
    feed_addr: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List markets, optionally filtered by symbol prefix
    Symbols {
        /// Case-insensitive symbol prefix
        prefix: Option<String>,
    },

    /// Fetch the complete bar dataset of a market
    Fetch {
        /// Market symbol (e.g., bitstampUSD)
        symbol: String,

        /// Bar interval (1m, 5m, 15m, 30m, 60m, 1d, 1w, 1mo)
        #[arg(short, long, default_value = "1d")]
        interval: Interval,

        /// Keep only the newest N bars
        #[arg(short = 'n', long)]
        last: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-download the full trade history of a market into the cache
    Backfill {
        /// Market symbol
        symbol: String,
    },

    /// Show the newest bar of a market
    Last {
        /// Market symbol
        symbol: String,

        /// Bar interval
        #[arg(short, long, default_value = "1m")]
        interval: Interval,
    },

    /// Follow a market live, printing bars as they change
    Watch {
        /// Market symbol
        symbol: String,

        /// Bar interval
        #[arg(short, long, default_value = "1m")]
        interval: Interval,

        /// Poll period in seconds
        #[arg(long, default_value = "1")]
        every: u64,
    },
}

/// Log level used when `RUST_LOG` is unset.
const fn default_level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Installs the tracing subscriber; `RUST_LOG` overrides the verbosity flags.
fn init_logging(verbose: u8, quiet: bool) {
    let default = default_level(verbose, quiet);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn engine_config(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(addr) = &cli.feed_addr {
        let feed = config.feed.clone().with_addr(addr);
        config = config.with_feed(feed);
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = engine_config(&cli);

    match command {
        Commands::Symbols { prefix } => commands::symbols::list_symbols(config, prefix.as_deref()).await,
        Commands::Fetch {
            symbol,
            interval,
            last,
            format,
            output,
        } => {
            commands::fetch::fetch(
                config,
                symbol,
                *interval,
                *last,
                *format,
                output.as_deref(),
                cli.quiet,
            )
            .await
        }
        Commands::Backfill { symbol } => commands::backfill::backfill(config, symbol, cli.quiet).await,
        Commands::Last { symbol, interval } => commands::last::show_last(config, symbol, *interval).await,
        Commands::Watch {
            symbol,
            interval,
            every,
        } => commands::watch::watch(config, symbol, *interval, *every, cli.quiet).await,
    }
}
