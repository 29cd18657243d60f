//! Command-line interface for the `flight-mint` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::Verbosity;

/// Live flight lookup endpoint and client
#[derive(Debug, Parser)]
#[command(name = "flight-mint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve GET /api/flight
    Serve,

    /// Search a running endpoint and print the matches
    Lookup(LookupCommand),
}

#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Flight number or ICAO24 code (e.g. HA92, A0B1C2)
    pub term: String,

    /// Endpoint origin; defaults to the configured bind address
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Show full detail for the Nth match (0-based)
    #[arg(long, value_name = "N")]
    pub select: Option<usize>,
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
