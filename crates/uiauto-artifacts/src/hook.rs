//! Screenshot and trace capture for failed tests.

use crate::paths::{ArtifactKind, ArtifactPaths};
use log::{error, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stage of a test the report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Setup,
    Call,
    Teardown,
}

/// Outcome of one test phase as reported by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Short test name, used in artifact file names.
    pub name: String,
    /// Fully qualified test id, used in log lines.
    pub node_id: String,
    pub phase: TestPhase,
    pub failed: bool,
}

/// Errors reported by a capture target.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture io error: {0}")]
    Io(#[from] io::Error),
    #[error("capture failed: {0}")]
    Failed(String),
}

/// Browser page able to dump a screenshot and its recorded trace.
pub trait CaptureTarget {
    /// Write a full-page PNG screenshot to `path`.
    fn screenshot(&mut self, path: &Path) -> Result<(), CaptureError>;
    /// Stop tracing and write the trace archive to `path`.
    fn stop_trace(&mut self, path: &Path) -> Result<(), CaptureError>;
}

/// Extra content attached to a test in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Image {
        src: String,
        mime_type: &'static str,
    },
    Html(String),
}

impl Attachment {
    /// Link that opens a trace archive in a new tab.
    pub fn trace_link(src: &str) -> Self {
        Self::Html(format!(
            "<a href=\"{}\" target=\"_blank\">Download trace</a>",
            escape_attr(src)
        ))
    }
}

/// Captures artifacts for failed tests and turns them into report attachments.
#[derive(Debug, Clone)]
pub struct FailureHook {
    paths: ArtifactPaths,
}

impl FailureHook {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Handle a finished test phase.
    ///
    /// Only a failed `Call` phase produces artifacts. A failed screenshot does
    /// not prevent the trace from being saved, and neither failure is raised.
    pub fn on_test_finished(
        &self,
        report: &TestReport,
        target: Option<&mut dyn CaptureTarget>,
    ) -> Vec<Attachment> {
        if report.phase != TestPhase::Call || !report.failed {
            return Vec::new();
        }
        error!(
            "test failed, capturing screenshot and trace: {}",
            report.node_id
        );
        let Some(target) = target else {
            warn!(
                "no page available for {}; skipping screenshot and trace",
                report.node_id
            );
            return Vec::new();
        };

        let mut attachments = Vec::new();
        match self.capture(ArtifactKind::Screenshot, &report.name, |path| {
            target.screenshot(path)
        }) {
            Ok(path) => {
                error!("saved failure screenshot: {}", path.display());
                attachments.push(Attachment::Image {
                    src: self.paths.report_relative(&path),
                    mime_type: ArtifactKind::Screenshot.mime_type(),
                });
            }
            Err(err) => error!("failed to save screenshot for {}: {err}", report.node_id),
        }

        match self.capture(ArtifactKind::Trace, &report.name, |path| {
            target.stop_trace(path)
        }) {
            Ok(path) => {
                error!("saved failure trace: {}", path.display());
                attachments.push(Attachment::trace_link(&self.paths.report_relative(&path)));
            }
            Err(err) => error!("failed to save trace for {}: {err}", report.node_id),
        }

        attachments
    }

    fn capture(
        &self,
        kind: ArtifactKind,
        test_name: &str,
        write: impl FnOnce(&Path) -> Result<(), CaptureError>,
    ) -> Result<PathBuf, CaptureError> {
        let path = self.paths.prepare(kind, test_name)?;
        write(&path)?;
        Ok(path)
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
