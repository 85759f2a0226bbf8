//! Progress reporting

use crate::ui::sink::EventSink;
use crate::types::SyncOutcome;
use indicatif::{ProgressBar, ProgressStyle};

/// Sink wrapper that ticks a progress bar once per completed file
///
/// The bar draws on stderr, so it never interleaves with sink output on
/// stdout or the log file.
pub struct ProgressSink {
    bar: ProgressBar,
    inner: Box<dyn EventSink>,
}

impl ProgressSink {
    /// Wrap `inner` with a bar sized to the candidate count
    pub fn new(total_files: u64, inner: Box<dyn EventSink>) -> Self {
        let bar = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files") {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar, inner }
    }

    /// Clear the bar once the run is over
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl EventSink for ProgressSink {
    fn record(&self, outcome: &SyncOutcome) {
        self.inner.record(outcome);
        self.bar.inc(1);
    }
}
