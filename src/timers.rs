// Timer seam: timeouts, animation frames, and cancellation.
// The browser implementation lives in web::timers; tests drive a manual clock.

use std::rc::Rc;
use std::time::Duration;

use crate::types::Timestamp;

pub type Task = Box<dyn FnOnce()>;
pub type FrameTask = Box<dyn FnOnce(Timestamp)>;

/// Handle of a scheduled callback. Frames and timeouts are cancelled through different APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    Timeout(i32),
    Frame(i32),
}

/// Schedules callbacks on the single UI thread.
pub trait Timers {
    /// Run `task` once after `delay`.
    fn after(&self, delay: Duration, task: Task) -> TimerId;

    /// Run `task` on the next animation frame with the frame timestamp.
    fn next_frame(&self, task: FrameTask) -> TimerId;

    /// Cancel a pending callback. Cancelling a fired or unknown id is a no-op.
    fn cancel(&self, id: TimerId);

    fn now(&self) -> Timestamp;
}

impl<T: Timers + ?Sized> Timers for Rc<T> {
    fn after(&self, delay: Duration, task: Task) -> TimerId {
        (**self).after(delay, task)
    }

    fn next_frame(&self, task: FrameTask) -> TimerId {
        (**self).next_frame(task)
    }

    fn cancel(&self, id: TimerId) {
        (**self).cancel(id)
    }

    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
pub(crate) use manual::ManualTimers;

#[cfg(test)]
mod manual {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::{FrameTask, Task, TimerId, Timers};
    use crate::types::Timestamp;

    pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    enum Pending {
        Once(Task),
        Frame(FrameTask),
    }

    struct Scheduled {
        id: TimerId,
        seq: u64,
        due: Timestamp,
        task: Pending,
    }

    #[derive(Default)]
    struct ClockState {
        now: Timestamp,
        seq: u64,
        scheduled: Vec<Scheduled>,
    }

    /// Deterministic clock for tests. Time only moves on `advance`.
    #[derive(Clone, Default)]
    pub(crate) struct ManualTimers {
        state: Rc<RefCell<ClockState>>,
    }

    impl ManualTimers {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        fn schedule(&self, delay: Duration, make_id: fn(i32) -> TimerId, task: Pending) -> TimerId {
            let mut state = self.state.borrow_mut();
            state.seq += 1;
            let seq = state.seq;
            let id = make_id(seq as i32);
            let due = state.now.offset_by(delay);
            state.scheduled.push(Scheduled { id, seq, due, task });
            id
        }

        /// Move time forward, running every callback that falls due, in due order.
        pub(crate) fn advance(&self, by: Duration) {
            let target = self.state.borrow().now.offset_by(by);
            loop {
                let next = {
                    let mut state = self.state.borrow_mut();
                    let position = state
                        .scheduled
                        .iter()
                        .enumerate()
                        .filter(|(_, s)| s.due <= target)
                        .min_by_key(|(_, s)| (s.due, s.seq))
                        .map(|(i, _)| i);
                    match position {
                        Some(i) => {
                            let scheduled = state.scheduled.remove(i);
                            state.now = scheduled.due;
                            Some(scheduled)
                        }
                        None => None,
                    }
                };
                let Some(scheduled) = next else { break };
                let now = scheduled.due;
                match scheduled.task {
                    Pending::Once(task) => task(),
                    Pending::Frame(task) => task(now),
                }
            }
            self.state.borrow_mut().now = target;
        }

        /// Run frames until nothing is pending or `limit` elapses.
        pub(crate) fn run_for(&self, limit: Duration) {
            let step = FRAME_INTERVAL;
            let mut elapsed = Duration::ZERO;
            while elapsed < limit && self.pending() > 0 {
                self.advance(step);
                elapsed += step;
            }
        }

        pub(crate) fn pending(&self) -> usize {
            self.state.borrow().scheduled.len()
        }
    }

    impl Timers for ManualTimers {
        fn after(&self, delay: Duration, task: Task) -> TimerId {
            self.schedule(delay, TimerId::Timeout, Pending::Once(task))
        }

        fn next_frame(&self, task: FrameTask) -> TimerId {
            self.schedule(FRAME_INTERVAL, TimerId::Frame, Pending::Frame(task))
        }

        fn cancel(&self, id: TimerId) {
            self.state.borrow_mut().scheduled.retain(|s| s.id != id);
        }

        fn now(&self) -> Timestamp {
            self.state.borrow().now
        }
    }
}
