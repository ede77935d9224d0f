use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::inventory::{TagFilter, DEFAULT_TAG_KEY, DEFAULT_TAG_VALUE};
use crate::run::{RunConfig, DEFAULT_THRESHOLD_HOURS};
use crate::terminator::DEFAULT_CONCURRENCY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
        }
    }
}

/// Detect/kill rogue CI machines
#[derive(Debug, Parser)]
#[command(name = "rustcleaner", version)]
pub struct Cli {
    /// Log level
    #[arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Time in hours after launch time to consider an instance rogue
    #[arg(
        long,
        default_value_t = DEFAULT_THRESHOLD_HOURS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub timeout: u32,

    /// Do not kill, just list rogue machines
    #[arg(long)]
    pub dry_run: bool,

    /// AWS region to scan (defaults to the SDK chain, then us-east-1)
    #[arg(long)]
    pub region: Option<String>,

    /// Tag key marking CI workloads
    #[arg(long, env = "RUSTCLEANER_TAG_KEY", default_value = DEFAULT_TAG_KEY)]
    pub tag_key: String,

    /// Tag value marking CI workloads
    #[arg(long, env = "RUSTCLEANER_TAG_VALUE", default_value = DEFAULT_TAG_VALUE)]
    pub tag_value: String,

    /// Maximum terminate requests in flight
    #[arg(
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub concurrency: usize,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            threshold_hours: self.timeout,
            report_only: self.dry_run,
            tag_filter: TagFilter::new(&self.tag_key, &self.tag_value),
            concurrency: self.concurrency,
        }
    }
}
