//! Test helpers shared across uiauto crates.

pub mod capture;
pub mod config;

pub use capture::{CaptureCall, RecordingCapture};
pub use config::{ConfigFixture, SAMPLE_BASE_YAML, sample_config};
