use std::time::{Duration, Instant};

/// Default cadence for persisting the reading position.
pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Throttles a stream of position notifications to at most one report per
/// interval, so persistence is not hit on every tick.
#[derive(Debug, Clone)]
pub struct PositionCoalescer {
    interval: Duration,
    last_report: Instant,
    pending: Option<usize>,
}

impl PositionCoalescer {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    /// A coalescer whose first interval begins at `start`.
    pub fn starting_at(interval: Duration, start: Instant) -> Self {
        Self {
            interval,
            last_report: start,
            pending: None,
        }
    }

    /// Record `position`. Returns the position to persist when an interval
    /// has elapsed since the last report.
    pub fn offer(&mut self, position: usize) -> Option<usize> {
        self.offer_at(position, Instant::now())
    }

    pub fn offer_at(&mut self, position: usize, now: Instant) -> Option<usize> {
        self.pending = Some(position);
        if now.duration_since(self.last_report) >= self.interval {
            self.last_report = now;
            return self.pending.take();
        }
        None
    }

    /// The latest position not yet reported, for teardown.
    pub fn flush(&mut self) -> Option<usize> {
        self.pending.take()
    }
}

impl Default for PositionCoalescer {
    fn default() -> Self {
        Self::new(AUTOSAVE_INTERVAL)
    }
}
