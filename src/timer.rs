/// An owned, cancellable fixed-cadence timer on logical milliseconds.
///
/// One `Interval` per timer role (scoring, countdown), armed at round
/// start and explicitly cancelled on every exit path. A cancelled
/// interval never fires again; `cancel` is idempotent. There is no
/// global timer registry to leak callbacks into.
#[derive(Debug, Clone)]
pub struct Interval {
    period_ms: u64,
    next_fire_ms: u64,
    cancelled: bool,
}

impl Interval {
    /// Arms the interval so the first fire lands one period after
    /// `start_ms`.
    pub fn starting_at(start_ms: u64, period_ms: u64) -> Self {
        assert!(period_ms > 0, "interval period must be positive");
        Self {
            period_ms,
            next_fire_ms: start_ms + period_ms,
            cancelled: false,
        }
    }

    /// Logical time of the next fire, or `None` once cancelled.
    pub fn next_fire_ms(&self) -> Option<u64> {
        if self.cancelled {
            None
        } else {
            Some(self.next_fire_ms)
        }
    }

    /// Counts fires due at or before `now_ms` and advances past them.
    /// A slow consumer observes multiple fires; they are never lost.
    pub fn fire_due(&mut self, now_ms: u64) -> u32 {
        if self.cancelled || now_ms < self.next_fire_ms {
            return 0;
        }
        let elapsed = now_ms - self.next_fire_ms;
        let fires = 1 + (elapsed / self.period_ms) as u32;
        self.next_fire_ms += fires as u64 * self.period_ms;
        fires
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
