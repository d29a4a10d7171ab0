//! Failure artifacts for UI test runs.
//!
//! Decides where screenshots, traces, videos and HAR files go, and turns a
//! failed test into report attachments. Capturing itself is delegated to a
//! [`CaptureTarget`] supplied by the browser layer.

mod hook;
mod paths;

pub use hook::{Attachment, CaptureError, CaptureTarget, FailureHook, TestPhase, TestReport};
pub use paths::{
    ArtifactKind, ArtifactPaths, RECORD_HAR_VAR, RECORD_VIDEO_VAR, RecordingOptions,
    report_relative, sanitize_test_name,
};
