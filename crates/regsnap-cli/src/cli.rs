use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "regsnap",
    about = "Snapshot registry keys and compare snapshots for configuration drift",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read a registry key recursively and save or print the snapshot
    Read(ReadArgs),
    /// Compare two saved snapshots
    Compare(CompareArgs),
}

#[derive(Args)]
pub struct ReadArgs {
    /// Root key, e.g. HKEY_CURRENT_USER\Software
    pub root: String,
    /// Write the snapshot document to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Omit subkeys that deny access instead of failing
    #[arg(long)]
    pub skip_inaccessible: bool,
}

#[derive(Args)]
pub struct CompareArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Report differences at their full nested path
    #[arg(long)]
    pub nested: bool,
}
