//! Progress delivery from a merge run.
//!
//! A run reports percentages in `[0, 100]`. Conversion covers the first half
//! of the range, assembly the next quarter and stamping the last quarter.
//! Sinks are called from the worker thread and must not block it.

use tokio::sync::mpsc::UnboundedSender;

/// Receives progress percentages.
pub trait ProgressSink: Send + Sync {
    /// Called with a value in `[0, 100]`; values never decrease within a run.
    fn report(&self, percent: f64);
}

impl<F> ProgressSink for F
where
    F: Fn(f64) + Send + Sync,
{
    fn report(&self, percent: f64) {
        self(percent)
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _percent: f64) {}
}

/// Forwards reports into an unbounded channel.
///
/// A dropped receiver is ignored, so a consumer that goes away never affects
/// the run.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: UnboundedSender<f64>,
}

impl ChannelProgress {
    /// Wrap `sender`.
    pub fn new(sender: UnboundedSender<f64>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&self, percent: f64) {
        let _ = self.sender.send(percent);
    }
}

/// A slice of the progress range owned by one phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpan {
    /// First value of the span.
    pub start: f64,
    /// Width of the span.
    pub width: f64,
}

impl PhaseSpan {
    /// 0 to 50.
    pub const CONVERTING: Self = Self {
        start: 0.0,
        width: 50.0,
    };

    /// 50 to 75.
    pub const ASSEMBLING: Self = Self {
        start: 50.0,
        width: 25.0,
    };

    /// 75 to 100.
    pub const STAMPING: Self = Self {
        start: 75.0,
        width: 25.0,
    };

    /// Value after `done` of `total` steps.
    pub fn at(self, done: usize, total: usize) -> f64 {
        if total == 0 {
            return self.start + self.width;
        }
        self.start + self.width * done as f64 / total as f64
    }
}

/// Keeps reported values monotonic and inside `[0, 100]`.
pub(crate) struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    last: f64,
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    pub(crate) fn report(&mut self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        if percent < self.last {
            return;
        }
        self.last = percent;
        self.sink.report(percent);
    }

    pub(crate) fn step(&mut self, span: PhaseSpan, done: usize, total: usize) {
        self.report(span.at(done, total));
    }

    pub(crate) fn finish(&mut self) {
        self.report(100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_phase_spans() {
        assert_eq!(PhaseSpan::CONVERTING.at(1, 2), 25.0);
        assert_eq!(PhaseSpan::ASSEMBLING.at(2, 2), 75.0);
        assert_eq!(PhaseSpan::STAMPING.at(1, 4), 81.25);
        assert_eq!(PhaseSpan::STAMPING.at(0, 0), 100.0);
    }

    #[test]
    fn test_tracker_is_monotonic_and_clamped() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: f64| seen.lock().unwrap().push(p);

        let mut tracker = ProgressTracker::new(&sink);
        tracker.report(10.0);
        tracker.report(5.0);
        tracker.report(150.0);
        tracker.report(-3.0);

        assert_eq!(*seen.lock().unwrap(), vec![10.0, 100.0]);
    }

    #[test]
    fn test_channel_progress_ignores_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelProgress::new(tx);
        drop(rx);
        sink.report(42.0);
    }

    #[test]
    fn test_channel_progress_delivers() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelProgress::new(tx);
        sink.report(12.5);
        assert_eq!(rx.try_recv().unwrap(), 12.5);
    }
}
