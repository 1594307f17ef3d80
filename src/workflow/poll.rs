//! Retry policy for the one endpoint that must be polled.

use std::time::Duration;

/// Bounded poll: at most `max_attempts` requests, with an optional fixed
/// pause between a "not ready" answer and the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    delay: Option<Duration>,
}

impl PollPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

    /// `max_attempts` of zero is raised to one: the request is always sent
    /// at least once.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Option<Duration> {
        self.delay
    }

    /// Pause to take after `attempt` (1-based) came back not ready, or
    /// `None` once the budget is spent.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.max_attempts).then(|| self.delay.unwrap_or(Duration::ZERO))
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts(), 1000);
        assert_eq!(policy.delay(), None);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        assert_eq!(PollPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn test_next_delay_until_budget_spent() {
        let policy = PollPolicy::new(3).with_delay(Duration::from_millis(50));
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(50)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(50)));
        assert_eq!(policy.next_delay(3), None);
    }

    #[test]
    fn test_zero_delay_is_busy_poll() {
        let policy = PollPolicy::new(2).with_delay(Duration::ZERO);
        assert_eq!(policy.delay(), None);
        assert_eq!(policy.next_delay(1), Some(Duration::ZERO));
    }
}
