use std::fmt;

/// Responses at most this many ticks old count as a good signal.
pub const GOOD_WITHIN_TICKS: u64 = 5;
/// Responses at most this many ticks old still count as a poor signal;
/// anything older (or never seen) counts as lost.
pub const POOR_WITHIN_TICKS: u64 = 30;

/// Decorative signal-quality strip states. Nothing depends on this for
/// correctness; it only colors the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalQuality {
    Good,
    Poor,
    #[default]
    Lost,
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SignalQuality::Good => "good",
            SignalQuality::Poor => "poor",
            SignalQuality::Lost => "lost",
        };
        write!(f, "{}", label)
    }
}

/// Poll-tick counter against the tick of the last successful response.
#[derive(Debug, Clone, Default)]
pub struct FreshnessCounter {
    tick: u64,
    last_response_tick: Option<u64>,
}

impl FreshnessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the poll tick.
    pub fn tick(&mut self) {
        self.tick += 1;
    }

    /// Records a successful response at the current tick.
    pub fn mark_response(&mut self) {
        self.last_response_tick = Some(self.tick);
    }

    /// Ticks elapsed since the last successful response, if any.
    pub fn age(&self) -> Option<u64> {
        self.last_response_tick.map(|last| self.tick - last)
    }

    pub fn quality(&self) -> SignalQuality {
        match self.age() {
            Some(age) if age <= GOOD_WITHIN_TICKS => SignalQuality::Good,
            Some(age) if age <= POOR_WITHIN_TICKS => SignalQuality::Poor,
            _ => SignalQuality::Lost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_with_age(age: u64) -> FreshnessCounter {
        let mut counter = FreshnessCounter::new();
        counter.tick();
        counter.mark_response();
        for _ in 0..age {
            counter.tick();
        }
        counter
    }

    #[test]
    fn starts_lost_until_first_response() {
        let mut counter = FreshnessCounter::new();
        assert_eq!(counter.quality(), SignalQuality::Lost);
        counter.tick();
        assert_eq!(counter.quality(), SignalQuality::Lost);
        counter.mark_response();
        assert_eq!(counter.quality(), SignalQuality::Good);
    }

    #[test]
    fn fresh_responses_are_good() {
        assert_eq!(counter_with_age(0).quality(), SignalQuality::Good);
        assert_eq!(counter_with_age(GOOD_WITHIN_TICKS).quality(), SignalQuality::Good);
    }

    #[test]
    fn stale_responses_are_poor_before_lost() {
        // Older than the good window but within the poor window.
        assert_eq!(
            counter_with_age(GOOD_WITHIN_TICKS + 1).quality(),
            SignalQuality::Poor
        );
        assert_eq!(counter_with_age(POOR_WITHIN_TICKS).quality(), SignalQuality::Poor);
    }

    #[test]
    fn ancient_responses_are_lost() {
        assert_eq!(
            counter_with_age(POOR_WITHIN_TICKS + 1).quality(),
            SignalQuality::Lost
        );
    }

    #[test]
    fn a_new_response_recovers_the_signal() {
        let mut counter = counter_with_age(POOR_WITHIN_TICKS + 10);
        assert_eq!(counter.quality(), SignalQuality::Lost);
        counter.mark_response();
        assert_eq!(counter.quality(), SignalQuality::Good);
    }
}
