//! Progress reporting for row streams.

use crate::constants::progress::{
    BAR_TEMPLATE, PROGRESS_CHARS, RESUMING_MESSAGE, SPINNER_TEMPLATE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Something that happened to an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Row skipped because the output already holds it.
    RowSkipped,
    /// Row transformed and written.
    RowProcessed,
    /// Number of input rows became known.
    TotalKnown(u64),
}

/// Observer of row events.
pub trait ProgressListener {
    /// Handle one event.
    fn on_event(&mut self, event: ProgressEvent);

    /// Called once when the stream is exhausted.
    fn finish(&mut self) {}
}

/// Listener ignoring every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ProgressListener for NoopListener {
    fn on_event(&mut self, _event: ProgressEvent) {}
}

/// Terminal progress display.
///
/// Shows a spinner until the total is known, then a bar. Skipped rows are
/// counted under a "Resuming" message.
#[derive(Debug)]
pub struct ProgressTracker {
    bar: ProgressBar,
    title: String,
    resuming: bool,
}

impl ProgressTracker {
    /// Create a tracker titled `title`, determinate when `total` is given.
    pub fn new(title: &str, total: Option<u64>) -> Self {
        let bar = total.map_or_else(
            || {
                let pb = ProgressBar::new_spinner();
                pb.set_style(spinner_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            },
            |total| {
                let pb = ProgressBar::new(total);
                pb.set_style(bar_style());
                pb
            },
        );
        bar.set_message(title.to_string());

        Self {
            bar,
            title: title.to_string(),
            resuming: false,
        }
    }

    /// Rows counted so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressListener for ProgressTracker {
    fn on_event(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::RowSkipped => {
                if !self.resuming {
                    self.resuming = true;
                    self.bar.set_message(RESUMING_MESSAGE);
                }
                self.bar.inc(1);
            }
            ProgressEvent::RowProcessed => {
                if self.resuming {
                    self.resuming = false;
                    self.bar.set_message(self.title.clone());
                }
                self.bar.inc(1);
            }
            ProgressEvent::TotalKnown(total) => {
                self.bar.disable_steady_tick();
                self.bar.set_length(total);
                self.bar.set_style(bar_style());
            }
        }
    }

    fn finish(&mut self) {
        self.bar.finish();
    }
}

/// Build the listener for a command run.
pub fn create_listener(
    title: &str,
    total: Option<u64>,
    enabled: bool,
) -> Box<dyn ProgressListener> {
    if enabled {
        Box::new(ProgressTracker::new(title, total))
    } else {
        Box::new(NoopListener)
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_counts_skipped_and_processed_rows() {
        let mut tracker = ProgressTracker::new("Test", None);
        tracker.on_event(ProgressEvent::RowSkipped);
        tracker.on_event(ProgressEvent::RowSkipped);
        assert!(tracker.resuming);

        tracker.on_event(ProgressEvent::RowProcessed);
        assert!(!tracker.resuming);
        assert_eq!(tracker.position(), 3);
        tracker.finish();
    }

    #[test]
    fn test_total_makes_bar_determinate() {
        let mut tracker = ProgressTracker::new("Test", None);
        tracker.on_event(ProgressEvent::TotalKnown(10));
        assert_eq!(tracker.bar.length(), Some(10));
    }

    #[test]
    fn test_disabled_listener_is_noop() {
        let mut listener = create_listener("Test", Some(5), false);
        listener.on_event(ProgressEvent::RowProcessed);
        listener.finish();
    }
}
