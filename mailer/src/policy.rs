use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// `base × attempt`: 1s, 2s, 3s for a 1s base.
    Linear,
    /// `base × 2^(attempt-1)`: 1s, 2s, 4s for a 1s base.
    Exponential,
}

/// Drives the attempt sequence of one dispatch.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    pub fn linear(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff: Backoff::Linear,
        }
    }

    /// Wait after the failed `attempt` (1-based) before the next one.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => self
                .base_delay
                .saturating_mul(2u32.saturating_pow(attempt - 1)),
        }
    }

    pub fn has_next(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_backoff_grows_by_base() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=3).map(|a| policy.delay_for(a).as_millis() as u64).collect();
        assert_eq!(delays, vec![1000, 2000, 3000]);
    }

    #[test]
    fn exponential_backoff_doubles() {
        let policy = RetryPolicy {
            backoff: Backoff::Exponential,
            ..RetryPolicy::default()
        };
        let delays: Vec<u64> = (1..=4).map(|a| policy.delay_for(a).as_millis() as u64).collect();
        assert_eq!(delays, vec![1000, 2000, 4000, 8000]);
    }

    #[test]
    fn attempts_are_bounded() {
        let policy = RetryPolicy::linear(3, Duration::from_millis(1));
        assert!(policy.has_next(1));
        assert!(policy.has_next(2));
        assert!(!policy.has_next(3));
        assert_eq!(RetryPolicy::linear(0, Duration::ZERO).max_attempts, 1);
    }
}
