//! Capture target that records calls and writes placeholder files.

use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uiauto_artifacts::{CaptureError, CaptureTarget};

/// A single call made against a [`RecordingCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCall {
    Screenshot(PathBuf),
    StopTrace(PathBuf),
}

/// Stub page: writes small files and optionally fails on request.
#[derive(Debug, Clone, Default)]
pub struct RecordingCapture {
    calls: Arc<Mutex<Vec<CaptureCall>>>,
    fail_screenshot: bool,
    fail_trace: bool,
}

impl RecordingCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_screenshot(mut self) -> Self {
        self.fail_screenshot = true;
        self
    }

    pub fn failing_trace(mut self) -> Self {
        self.fail_trace = true;
        self
    }

    pub fn calls(&self) -> Vec<CaptureCall> {
        self.calls.lock().clone()
    }
}

impl CaptureTarget for RecordingCapture {
    fn screenshot(&mut self, path: &Path) -> Result<(), CaptureError> {
        self.calls
            .lock()
            .push(CaptureCall::Screenshot(path.to_path_buf()));
        if self.fail_screenshot {
            return Err(CaptureError::Failed("page closed".to_string()));
        }
        fs::write(path, b"png")?;
        Ok(())
    }

    fn stop_trace(&mut self, path: &Path) -> Result<(), CaptureError> {
        self.calls
            .lock()
            .push(CaptureCall::StopTrace(path.to_path_buf()));
        if self.fail_trace {
            return Err(CaptureError::Failed("tracing not started".to_string()));
        }
        fs::write(path, b"zip")?;
        Ok(())
    }
}
