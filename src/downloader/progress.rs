//! Batch progress reporting
//!
//! Batches can run for minutes once retries and rate-limit backoff get
//! involved, so the orchestrator reports completion after every slot
//! through a [`ProgressSink`]. The crate ships [`NoopProgress`] and a
//! log-emitting [`TracingProgress`]; callers wire their own sink for UI
//! integration.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Receives batch completion updates.
///
/// Called once per finished slot, success or failure, from whichever
/// worker finished it.
pub trait ProgressSink: Send + Sync {
    /// `completed` slots out of `total` have finished.
    fn on_progress(&self, completed: usize, total: usize);
}

/// Sink that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Sink that logs each update with rate and remaining-time estimates.
pub struct TracingProgress {
    state: Mutex<Option<BatchProgress>>,
}

impl TracingProgress {
    /// Fresh sink; its internal tracker starts on the first update.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TracingProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        let Ok(mut guard) = self.state.lock() else {
            return;
        };
        let progress = guard.get_or_insert_with(|| BatchProgress::new(total));
        progress.completed = completed;
        info!("{}", progress.format_progress());
    }
}

/// Progress arithmetic for one batch run.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Total slots in the batch
    pub total: usize,
    /// Slots finished so far
    pub completed: usize,
    /// When the batch started
    pub start_time: Instant,
}

impl BatchProgress {
    /// Tracker for a batch of `total` slots, started now.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            start_time: Instant::now(),
        }
    }

    /// Completion percentage, 0-100. An empty batch is 100% done.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    /// Completed slots per second since the batch started.
    pub fn rate(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.completed as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Remaining-time estimate from the observed rate.
    pub fn estimate_remaining(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.completed);
        if remaining == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(remaining as f64 / rate))
    }

    /// Human-readable progress line for logging.
    pub fn format_progress(&self) -> String {
        let mut parts = vec![format!(
            "[PROGRESS] Completed {}/{} requests - {:.1}%",
            self.completed,
            self.total,
            self.percentage()
        )];

        let rate = self.rate();
        if rate > 0.0 {
            parts.push(format!("at {rate:.1} req/sec"));
        }

        if let Some(remaining) = self.estimate_remaining() {
            parts.push(format!("- ~{} remaining", format_duration(remaining)));
        }

        parts.join(" ")
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{:.1}h", secs as f64 / 3600.0)
    }
}
