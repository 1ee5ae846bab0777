// Count-up animation: 0 → target, linear over a fixed duration, floored, snapping to target on the last frame.
// A counter starts at most once per page load.

use std::time::Duration;

use crate::types::Timestamp;

/// Which stat a counter displays, when the markup names it with `data-stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountStat {
    Hours,
    Movies,
}

impl CountStat {
    pub fn as_str(self) -> &'static str {
        match self {
            CountStat::Hours => "hours",
            CountStat::Movies => "movies",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "hours" => Some(CountStat::Hours),
            "movies" => Some(CountStat::Movies),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountState {
    Idle,
    Running { started_at: Timestamp },
    Finished,
}

/// One `.count-up` element.
#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    target: u64,
    stat: Option<CountStat>,
    state: CountState,
}

impl CountUp {
    pub fn new(target: u64) -> Self {
        CountUp {
            target,
            stat: None,
            state: CountState::Idle,
        }
    }

    pub fn with_stat(mut self, stat: Option<CountStat>) -> Self {
        self.stat = stat;
        self
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn stat(&self) -> Option<CountStat> {
        self.stat
    }

    /// The write-once `done` flag. Set by the first `start`, never cleared.
    pub fn is_done(&self) -> bool {
        self.state != CountState::Idle
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, CountState::Running { .. })
    }

    /// Start the animation. Returns false if it already ran.
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.is_done() {
            return false;
        }
        self.state = CountState::Running { started_at: now };
        true
    }

    /// Value to paint at `now`, or `None` when the counter is not animating.
    pub fn frame(&mut self, now: Timestamp, duration: Duration) -> Option<u64> {
        let CountState::Running { started_at } = self.state else {
            return None;
        };

        let progress = if duration.is_zero() {
            1.0
        } else {
            (now.since(started_at).as_secs_f64() / duration.as_secs_f64()).min(1.0)
        };

        if progress >= 1.0 {
            self.state = CountState::Finished;
            Some(self.target)
        } else {
            Some((self.target as f64 * progress).floor() as u64)
        }
    }

    /// Change the target. Returns the value to repaint when the counter already finished.
    pub fn retarget(&mut self, target: u64) -> Option<u64> {
        self.target = target;
        match self.state {
            CountState::Finished => Some(target),
            _ => None,
        }
    }
}
