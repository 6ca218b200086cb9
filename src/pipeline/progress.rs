// file: src/pipeline/progress.rs
// description: progress spinner and statistics reporting for pipeline execution
// reference: uses indicatif for progress display and tracks per-run counts

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines_read: usize,
    pub comment_lines: usize,
    pub malformed_lines: usize,
    pub ranges_emitted: usize,
    pub duration_ms: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of non-comment lines that produced a range, as a percentage.
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.ranges_emitted + self.malformed_lines;
        if total == 0 {
            return 0.0;
        }
        (self.ranges_emitted as f64 / total as f64) * 100.0
    }

    pub fn ranges_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.ranges_emitted as f64 / (self.duration_ms as f64 / 1000.0)
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub fn new(colored: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        let template = if colored {
            "{spinner:.green} [{elapsed_precise}] {msg}"
        } else {
            "{spinner} [{elapsed_precise}] {msg}"
        };

        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, stats: &PipelineStats) {
        self.bar.set_message(format!(
            "Ranges: {} | Skipped: {} | Lines: {}",
            stats.ranges_emitted, stats.malformed_lines, stats.lines_read
        ));
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}
