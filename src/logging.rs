//! Tracing subscriber setup
//!
//! The TUI owns stdout/stderr while it runs, so interactive sessions log to a
//! daily-rotated file. CLI subcommands log to stderr.

use anyhow::Result;
use std::io;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Where log lines go
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Build the level filter: `RUST_LOG` wins, otherwise quiet/verbose flags
fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    let default = if verbose {
        "debug,hyper=warn,reqwest=warn"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber
pub fn init(target: LogTarget<'_>, verbose: bool, quiet: bool) -> Result<()> {
    let registry = Registry::default().with(filter(verbose, quiet));

    match target {
        LogTarget::File(log_path) => {
            let log_dir = log_path
                .parent()
                .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
            std::fs::create_dir_all(log_dir)?;

            let log_filename = log_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

            // "flixtui.log" rotates as flixtui.2026-10-18 etc.
            let log_prefix = log_filename.rsplit_once('.').map(|(p, _)| p).unwrap_or(log_filename);

            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);

            registry.with(fmt_layer).try_init()?;
        }
        LogTarget::Stderr => {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(io::stderr);

            registry.with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}
