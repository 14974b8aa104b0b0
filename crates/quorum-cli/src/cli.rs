use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "quorum",
    about = "Quorum utility layer: bounded file transfers and host diagnostics",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Default log level (overrides the configuration file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the detected host platform
    Platform,
    /// Read an exact byte range from a file
    Read(ReadArgs),
    /// Write bytes into a file at a position
    Write(WriteArgs),
    /// Read a file to its end and count the bytes
    Drain(DrainArgs),
}

#[derive(Args)]
pub struct ReadArgs {
    pub path: PathBuf,
    /// Bytes to skip before reading
    #[arg(long, default_value_t = 0)]
    pub offset: u64,
    /// Exact number of bytes to read
    #[arg(long)]
    pub length: usize,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: PathBuf,
    /// File position of the first byte
    #[arg(long, default_value_t = 0)]
    pub position: u64,
    /// Bytes to write, hex encoded
    #[arg(long)]
    pub hex: String,
    /// Create the file if it does not exist
    #[arg(long)]
    pub create: bool,
}

#[derive(Args)]
pub struct DrainArgs {
    pub path: PathBuf,
    /// Scratch buffer size (defaults to the configured value)
    #[arg(long)]
    pub buffer_size: Option<usize>,
}
