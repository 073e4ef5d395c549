//! Progress reporting for long file scans
//!
//! Logs a progress line every `interval` lines with percent complete and an
//! estimated time left, and optionally drives an `indicatif` bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::info;

/// Snapshot logged at each progress milestone
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub line_number: usize,
    pub total_lines: usize,
    pub skipped: usize,
    /// Completion ratio in [0, 1]
    pub ratio: f64,
    pub time_left: Duration,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        self.ratio * 100.0
    }
}

/// Tracks lines consumed against a known total
pub struct ProgressTracker {
    total_lines: usize,
    interval: usize,
    started: Instant,
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    pub fn new(total_lines: usize, interval: usize) -> Self {
        ProgressTracker {
            total_lines,
            interval: interval.max(1),
            started: Instant::now(),
            bar: None,
        }
    }

    /// Also advance a terminal progress bar sized to the total line count
    pub fn with_progress_bar(mut self) -> Self {
        self.bar = Some(create_line_progress(self.total_lines as u64));
        self
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Record that `line_number` (1-based) has been read
    ///
    /// Returns the snapshot when this line is a progress milestone.
    pub fn record_line(&self, line_number: usize, skipped: usize) -> Option<ProgressSnapshot> {
        if let Some(ref bar) = self.bar {
            bar.set_position(line_number as u64);
        }

        if line_number % self.interval != 0 {
            return None;
        }

        let snapshot = self.snapshot(line_number, skipped, self.started.elapsed());
        info!(
            "reading line {} ({:.2}%), #skipped {}, estimated time left: {}",
            snapshot.line_number,
            snapshot.percent(),
            snapshot.skipped,
            format_duration(snapshot.time_left)
        );
        Some(snapshot)
    }

    fn snapshot(&self, line_number: usize, skipped: usize, elapsed: Duration) -> ProgressSnapshot {
        let ratio = completion_ratio(line_number, self.total_lines);
        ProgressSnapshot {
            line_number,
            total_lines: self.total_lines,
            skipped,
            ratio,
            time_left: estimate_time_left(elapsed, ratio),
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

fn completion_ratio(line_number: usize, total_lines: usize) -> f64 {
    if total_lines == 0 {
        return 1.0;
    }
    (line_number as f64 / total_lines as f64).min(1.0)
}

/// elapsed * (1 - ratio) / ratio
pub fn estimate_time_left(elapsed: Duration, ratio: f64) -> Duration {
    if ratio <= 0.0 {
        return Duration::ZERO;
    }
    elapsed.mul_f64((1.0 - ratio).max(0.0) / ratio)
}

/// Format a duration as H:MM:SS
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn create_line_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} lines ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
