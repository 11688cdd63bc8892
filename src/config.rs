//! Launch parameters.
//!
//! Every option can also come from a `SUBNETS_*` environment variable;
//! `main` loads a `.env` file before parsing.

use crate::error::{Error, Result};
use clap::Parser;
use std::path::PathBuf;

/// Upper bound on the worker count.
pub const MAX_WORKERS: usize = 64;

/// Default output file, overwritten on every run.
pub const DEFAULT_OUTPUT: &str = "result.txt";

/// Compute the minimal CIDR list for (added subnets) minus (subtracted subnets)
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Thread count, a power of two from 1 to 64
    #[arg(short = 't', long = "threads", env = "SUBNETS_THREADS")]
    pub threads: usize,

    /// Path to the subnets to add
    #[arg(short, long, env = "SUBNETS_ADD")]
    pub add: PathBuf,

    /// Path to the subnets to subtract
    #[arg(short, long, env = "SUBNETS_SUBTRACT")]
    pub subtract: Option<PathBuf>,

    /// Where to write the resulting subnets
    #[arg(short, long, default_value = DEFAULT_OUTPUT, env = "SUBNETS_OUTPUT")]
    pub output: PathBuf,

    /// Also write the per-thread subnets, before the final merge
    #[arg(long, env = "SUBNETS_PARTIALS")]
    pub partials: Option<PathBuf>,

    /// Write a JSON run report
    #[arg(long, env = "SUBNETS_REPORT")]
    pub report: Option<PathBuf>,

    /// log4rs YAML config; a console logger is used if the file is missing
    #[arg(long, default_value = "log4rs.yml", env = "SUBNETS_LOG_CONFIG")]
    pub log_config: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        validate_workers(self.threads)?;
        if self.add.as_os_str().is_empty() {
            return Err(Error::Config(
                "program needs the path to the subnets to add".to_string(),
            ));
        }
        Ok(())
    }
}

/// The address space is split evenly, so the count must be a power of two.
pub fn validate_workers(workers: usize) -> Result<()> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(Error::Config(format!(
            "program needs a thread count from 1 to {MAX_WORKERS}, got {workers}"
        )));
    }
    if !workers.is_power_of_two() {
        return Err(Error::Config(format!(
            "program needs a thread count that is a power of 2, got {workers}"
        )));
    }
    Ok(())
}
