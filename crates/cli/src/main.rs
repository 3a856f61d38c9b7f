//! Cache simulator CLI.
//!
//! This binary replays a memory trace against a set-associative LRU cache. It performs:
//! 1. **Configuration:** Geometry from `-s`/`-E`/`-b`, optionally layered over a JSON config file.
//! 2. **Replay:** Streams the trace file through the engine, optionally echoing each record's outcome.
//! 3. **Reporting:** Prints the one-line summary, a sectioned report, or JSON.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use csim_core::config::Config;
use csim_core::{Replayer, SimError};

#[derive(Parser, Debug)]
#[command(
    name = "csim",
    author,
    version,
    about = "Set-associative LRU cache simulator",
    long_about = "Replay a memory trace against a write-allocate, write-back LRU cache and count hits, misses, evictions, dirty bytes and repeat accesses.\n\nExamples:\n  csim -s 4 -E 1 -b 4 -t traces/yi.trace\n  csim -v -s 2 -E 2 -b 3 -t traces/dave.trace\n  csim --config cache.json -t traces/trans.trace --json"
)]
struct Cli {
    /// Number of set index bits (2^s sets).
    #[arg(short = 's', value_name = "S", required_unless_present = "config")]
    set_bits: Option<u32>,

    /// Associativity (lines per set).
    #[arg(short = 'E', value_name = "E", required_unless_present = "config")]
    ways: Option<usize>,

    /// Number of block bits (2^b bytes per block).
    #[arg(short = 'b', value_name = "B", required_unless_present = "config")]
    block_bits: Option<u32>,

    /// Trace file to replay.
    #[arg(short = 't', value_name = "TRACE")]
    trace: PathBuf,

    /// Print the outcome of every replayed record.
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; command-line flags override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the counters as JSON instead of the summary line.
    #[arg(long, conflicts_with = "report")]
    json: bool,

    /// Print the sectioned statistics report after the summary line.
    #[arg(long)]
    report: bool,
}

impl Cli {
    /// Builds the effective configuration: file (or defaults), then flag overrides.
    fn resolve_config(&self) -> Result<Config, SimError> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(s) = self.set_bits {
            config.cache.set_bits = s;
        }
        if let Some(e) = self.ways {
            config.cache.ways = e;
        }
        if let Some(b) = self.block_bits {
            config.cache.block_bits = b;
        }
        config.general.verbose |= self.verbose;
        Ok(config)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("csim: {e}");
        process::exit(1);
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the cache, replays the trace, and prints the requested output.
/// Stderr diagnostic for malformed trace lines, printed in every output mode.
fn skipped_notice(skipped: u64) -> Option<String> {
    (skipped > 0).then(|| format!("csim: skipped {skipped} malformed trace line(s)"))
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let config = cli.resolve_config()?;
    let geometry = config.cache.geometry()?;
    tracing::debug!(?geometry, trace = %cli.trace.display(), "starting replay");

    let mut replayer = Replayer::new(geometry)?;
    let verbose = config.general.verbose;
    replayer.replay_file_with(&cli.trace, |outcome| {
        if verbose {
            println!("{outcome}");
        }
    })?;

    if let Some(notice) = skipped_notice(replayer.skipped_lines()) {
        eprintln!("{notice}");
    }

    let stats = replayer.stats();
    if cli.json {
        match serde_json::to_string_pretty(stats) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(%e, "failed to serialize statistics"),
        }
        return Ok(());
    }

    println!("{}", stats.summary_line());
    if cli.report {
        stats
            .print()
            .unwrap_or_else(|e| tracing::error!(%e, "failed to write statistics report"));
    }
    Ok(())
}
