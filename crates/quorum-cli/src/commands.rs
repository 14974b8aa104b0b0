use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use quorum_env::{LogControl, Platform, UtilConfig};
use quorum_io::{drain, read_fully, skip_fully, write_fully, CloseGuard};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = effective_config(cli.config.as_deref(), cli.log_level.as_deref())?;
    let logging = LogControl::install(&config.logging)?;
    debug!(?config, filter = %logging.current_filter()?, "configuration loaded");

    match cli.command {
        Command::Platform => cmd_platform(cli.format),
        Command::Read(args) => cmd_read(args, cli.format),
        Command::Write(args) => cmd_write(args, cli.format),
        Command::Drain(args) => cmd_drain(args, &config, cli.format),
    }
}

/// Load the configuration file, if any, then apply the `--log-level` override.
fn effective_config(path: Option<&Path>, log_level: Option<&str>) -> anyhow::Result<UtilConfig> {
    let mut config = match path {
        Some(path) => UtilConfig::load(path)?,
        None => UtilConfig::default(),
    };
    if let Some(level) = log_level {
        config.logging.default_level = level.to_string();
    }
    Ok(config)
}

fn cmd_platform(format: OutputFormat) -> anyhow::Result<()> {
    let platform = Platform::current()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(platform)?),
        OutputFormat::Text => {
            println!("OS: {}", platform.os.to_string().bold());
            println!("Arch: {}", platform.arch.cyan());
            if platform.ppc64 {
                println!("  {}", "ppc64".yellow());
            }
        }
    }
    Ok(())
}

fn cmd_read(args: ReadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let bytes = read_range(&args.path, args.offset, args.length)?;
    let encoded = hex::encode(&bytes);
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "path": args.path.display().to_string(),
                "offset": args.offset,
                "length": args.length,
                "hex": encoded,
            })
        ),
        OutputFormat::Text => {
            println!(
                "{} {} byte(s) at offset {}",
                "✓".green().bold(),
                args.length.to_string().bold(),
                args.offset
            );
            println!("  {}", encoded.yellow());
        }
    }
    Ok(())
}

fn cmd_write(args: WriteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let data = hex::decode(args.hex.trim()).context("--hex is not valid hex")?;
    write_range(&args.path, args.position, &data, args.create)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "path": args.path.display().to_string(),
                "position": args.position,
                "written": data.len(),
            })
        ),
        OutputFormat::Text => println!(
            "{} Wrote {} byte(s) to {} at position {}",
            "✓".green().bold(),
            data.len().to_string().bold(),
            args.path.display(),
            args.position
        ),
    }
    Ok(())
}

fn cmd_drain(args: DrainArgs, config: &UtilConfig, format: OutputFormat) -> anyhow::Result<()> {
    let buffer_size = args
        .buffer_size
        .unwrap_or(config.transfer.drain_buffer_size);
    let total = drain_file(&args.path, buffer_size)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "path": args.path.display().to_string(), "bytes": total })
        ),
        OutputFormat::Text => println!(
            "{} {} byte(s) in {}",
            "✓".green().bold(),
            total.to_string().bold(),
            args.path.display()
        ),
    }
    Ok(())
}

fn open_for_read(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

/// Skip `offset` bytes, then read exactly `length` bytes.
fn read_range(path: &Path, offset: u64, length: usize) -> anyhow::Result<Vec<u8>> {
    let mut file = open_for_read(path)?;
    skip_fully(&mut file, offset)
        .with_context(|| format!("cannot reach offset {offset} in {}", path.display()))?;
    let mut buf = vec![0u8; length];
    read_fully(&mut file, &mut buf, 0, length)
        .with_context(|| format!("cannot read {length} byte(s) from {}", path.display()))?;
    Ok(buf)
}

/// Write all of `data` at `position`, syncing the file before returning.
fn write_range(path: &Path, position: u64, data: &[u8], create: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(create)
        .open(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;

    // On an error path the guard closes the file quietly.
    let mut guard = CloseGuard::new(file);
    if let Some(file) = guard.as_mut() {
        write_fully(file, data, position)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    guard
        .close()
        .with_context(|| format!("failed to sync {}", path.display()))
}

fn drain_file(path: &Path, buffer_size: usize) -> anyhow::Result<u64> {
    let mut file = open_for_read(path)?;
    Ok(drain(&mut file, buffer_size)?)
}
