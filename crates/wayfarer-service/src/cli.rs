//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wayfarer - track places to visit and places already visited.
#[derive(Debug, Parser)]
#[command(name = "wayfarer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "WAYFARER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configuration file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Command to run; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve JSON-line requests on stdin/stdout (default)
    Serve,

    /// Write all places and settings to a JSON file
    Export(ExportArgs),

    /// Merge places and settings from an export file
    Import(ImportArgs),

    /// Show todo and visited counts
    Stats,

    /// List saved places
    List(ListArgs),

    /// Erase all places and settings
    Clear(ClearArgs),
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Output file (default: wayfarer-YYYY-MM-DD.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Export file to read
    pub file: PathBuf,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// List visited places instead of the todo list
    #[arg(long)]
    pub visited: bool,
}

/// Arguments for the clear command.
#[derive(Debug, Parser)]
pub struct ClearArgs {
    /// Skip confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}
