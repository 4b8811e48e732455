use std::time::{Duration, Instant};

/// When the runtime should redraw a window on its own.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RedrawPolicy {
    /// Redraw every time the event loop goes idle.
    #[default]
    Continuous,
    /// Redraw on a fixed cadence; the loop sleeps in between.
    Interval(Duration),
}

/// Fixed-period deadline tracker.
///
/// The ticker is phase-locked to its start instant: deadlines are always
/// `start + k * period`. A late wakeup fires once and skips every period it
/// overslept, so a stalled loop never produces a burst of redraws.
#[derive(Debug, Clone)]
pub struct RefreshTicker {
    period: Duration,
    next: Instant,
}

impl RefreshTicker {
    /// Minimum accepted period; shorter values are raised to this.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Creates a ticker whose first deadline is one `period` after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(Self::MIN_PERIOD);
        Self {
            period,
            next: start + period,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Instant at which the next tick is due.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Returns `true` (once) if the deadline has passed at `now`, then moves
    /// the deadline to the first period boundary strictly after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        let late = now.saturating_duration_since(self.next);
        let skipped = (late.as_nanos() / self.period.as_nanos()).min(u32::MAX as u128 - 1) as u32;
        if skipped > 0 {
            log::trace!("refresh ticker skipped {skipped} period(s)");
        }
        self.next += self.period * (skipped + 1);
        true
    }
}
