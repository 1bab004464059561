use std::ops::Add;
use std::time::Duration;

/// Default trailing window for stat slider edits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// A cancellable trailing-edge timer.
///
/// It holds no runtime timer itself: callers pass in "now", read the
/// deadline back, and decide how to sleep until it. Every `schedule` pushes
/// the deadline out again, so a burst of calls fires once, one window after
/// the last call.
#[derive(Debug, Clone)]
pub struct Debouncer<I = tokio::time::Instant> {
    window: Duration,
    deadline: Option<I>,
}

impl<I> Debouncer<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: I) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<I> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true (and disarms) if the deadline has been reached.
    pub fn fire_if_due(&mut self, now: I) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
