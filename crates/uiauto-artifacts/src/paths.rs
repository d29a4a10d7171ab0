//! Output paths for failure artifacts.

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uiauto_config::{ReportConfig, ResolvedConfig};

/// Enables video recording when set to `true`.
pub const RECORD_VIDEO_VAR: &str = "UI_RECORD_VIDEO";
/// Enables HAR recording when set to `true`.
pub const RECORD_HAR_VAR: &str = "UI_RECORD_HAR";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";
const LOG_FILE_PREFIX: &str = "ui_automation";

/// Kind of file captured for a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Screenshot,
    Trace,
    Video,
    Har,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Screenshot => "png",
            Self::Trace => "zip",
            Self::Video => "webm",
            Self::Har => "har",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Screenshot => "image/png",
            Self::Trace => "application/zip",
            Self::Video => "video/webm",
            Self::Har => "application/json",
        }
    }
}

/// Artifact locations derived from the `report` config section.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    report: ReportConfig,
}

impl ArtifactPaths {
    pub fn new(report: &ReportConfig) -> Self {
        Self {
            report: report.clone(),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(&config.report)
    }

    pub fn report_root(&self) -> &Path {
        &self.report.root
    }

    pub fn dir(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Screenshot => &self.report.screenshot_dir,
            ArtifactKind::Trace => &self.report.trace_dir,
            ArtifactKind::Video => &self.report.video_dir,
            ArtifactKind::Har => &self.report.har_dir,
        }
    }

    /// `<dir>/<test>_<timestamp>.<ext>` without touching the filesystem.
    pub fn path_for(&self, kind: ArtifactKind, test_name: &str, timestamp: NaiveDateTime) -> PathBuf {
        let file_name = format!(
            "{}_{}.{}",
            sanitize_test_name(test_name),
            timestamp.format(TIMESTAMP_FORMAT),
            kind.extension()
        );
        self.dir(kind).join(file_name)
    }

    /// Create the artifact directory and return a fresh path stamped with the local time.
    pub fn prepare(&self, kind: ArtifactKind, test_name: &str) -> io::Result<PathBuf> {
        let dir = self.dir(kind);
        fs::create_dir_all(dir)?;
        let path = self.path_for(kind, test_name, Local::now().naive_local());
        debug!("prepared {:?} path: {}", kind, path.display());
        Ok(path)
    }

    /// Link target for `path` as seen from the report directory.
    pub fn report_relative(&self, path: &Path) -> String {
        report_relative(path, &self.report.root)
    }

    /// Daily log file, e.g. `reports/logs/ui_automation_20261018.log`.
    pub fn log_file(&self, date: NaiveDate) -> PathBuf {
        self.report
            .log_dir
            .join(format!("{LOG_FILE_PREFIX}_{}.log", date.format("%Y%m%d")))
    }
}

/// Strip `root` from `path` when possible and render with `/` separators.
pub fn report_relative(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

/// Replace path separators so a test name stays a single file name.
pub fn sanitize_test_name(name: &str) -> String {
    name.chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect()
}

/// Optional per-test recordings switched on from the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingOptions {
    pub record_video: bool,
    pub record_har: bool,
}

impl RecordingOptions {
    /// Read `UI_RECORD_VIDEO` / `UI_RECORD_HAR`.
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(RECORD_VIDEO_VAR).ok().as_deref(),
            std::env::var(RECORD_HAR_VAR).ok().as_deref(),
        )
    }

    pub fn from_values(video: Option<&str>, har: Option<&str>) -> Self {
        Self {
            record_video: is_enabled(video),
            record_har: is_enabled(har),
        }
    }

    /// Directory the browser context should record video into, if enabled.
    pub fn video_dir(&self, paths: &ArtifactPaths) -> io::Result<Option<PathBuf>> {
        if !self.record_video {
            return Ok(None);
        }
        let dir = paths.dir(ArtifactKind::Video);
        fs::create_dir_all(dir)?;
        Ok(Some(dir.to_path_buf()))
    }

    /// HAR file for `test_name`, if enabled.
    pub fn har_path(&self, paths: &ArtifactPaths, test_name: &str) -> io::Result<Option<PathBuf>> {
        if !self.record_har {
            return Ok(None);
        }
        paths.prepare(ArtifactKind::Har, test_name).map(Some)
    }
}

fn is_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}
