//! Public surface for uiauto.
//!
//! Re-exports the config, artifact and API crates and provides the logging
//! setup shared by test harness binaries.

pub mod cli;

/// Re-export for convenience.
pub use uiauto_api as api;
/// Re-export for convenience.
pub use uiauto_artifacts as artifacts;
/// Re-export for convenience.
pub use uiauto_config as config;

use anyhow::Context;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use uiauto_artifacts::ArtifactPaths;
use uiauto_config::ReportConfig;

/// Where log records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Stderr plus `report.log_dir/ui_automation_YYYYMMDD.log` (appended).
    DailyFile,
}

/// Initialize `env_logger` (default level `info`, `RUST_LOG` honored).
///
/// Returns the log file path when logging to a file. Fails if a logger is
/// already installed for the process.
pub fn init_logging(report: &ReportConfig, target: LogTarget) -> anyhow::Result<Option<PathBuf>> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();

    let log_file = match target {
        LogTarget::Stderr => None,
        LogTarget::DailyFile => {
            let path = ArtifactPaths::new(report).log_file(chrono::Local::now().date_naive());
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create log dir {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
            Some(path)
        }
    };

    builder
        .try_init()
        .context("failed to install logger; one is already set")?;
    Ok(log_file)
}

/// Copies every log record to stderr and the daily log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        io::stderr().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}
