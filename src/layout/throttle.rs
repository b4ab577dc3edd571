use std::time::{Duration, Instant};

/// Default throttle delay: one recomputation per 66 ms, about 15 fps.
pub const RESIZE_DELAY: Duration = Duration::from_millis(66);

/// Rate limiter for layout recomputation.
///
/// The first size-change event of a burst schedules one recomputation,
/// deferred by the configured delay; every further event arriving while
/// that recomputation is pending is dropped. There is no timer to cancel;
/// the pending deadline doubles as the "busy" flag.
#[derive(Debug, Clone)]
pub struct ResizeThrottle {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ResizeThrottle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Registers a size-change event. Ignored while a recomputation is
    /// already scheduled.
    pub fn request(&mut self, now: Instant) {
        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    /// True once the scheduled recomputation is due; clears the pending
    /// state so the next event starts a fresh burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for ResizeThrottle {
    fn default() -> Self {
        Self::new(RESIZE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_into_one_recomputation() {
        let mut throttle = ResizeThrottle::new(Duration::from_millis(66));
        let t0 = Instant::now();

        throttle.request(t0);
        throttle.request(t0 + Duration::from_millis(10));
        throttle.request(t0 + Duration::from_millis(40));

        // Not due yet, and still due relative to the FIRST event.
        assert!(!throttle.fire(t0 + Duration::from_millis(65)));
        assert!(throttle.fire(t0 + Duration::from_millis(66)));

        // Exactly one firing per burst.
        assert!(!throttle.fire(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn next_burst_schedules_again() {
        let mut throttle = ResizeThrottle::new(Duration::from_millis(66));
        let t0 = Instant::now();

        throttle.request(t0);
        assert!(throttle.fire(t0 + Duration::from_millis(70)));

        throttle.request(t0 + Duration::from_millis(100));
        assert!(throttle.pending());
        assert!(!throttle.fire(t0 + Duration::from_millis(150)));
        assert!(throttle.fire(t0 + Duration::from_millis(166)));
    }

    #[test]
    fn idle_throttle_never_fires() {
        let mut throttle = ResizeThrottle::default();
        assert!(!throttle.pending());
        assert!(!throttle.fire(Instant::now()));
    }
}
