//! Exponential backoff with jitter.

use std::time::Duration;
use rand::Rng;

/// Calculate exponential backoff delay with jitter.
///
/// `attempt` 1 yields `base_ms`, each further attempt doubles it, capped at
/// `max_ms`. Up to 10% jitter is added on top.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        assert_eq!(calculate_backoff(0, 5, 1000), Duration::ZERO);

        let b1 = calculate_backoff(1, 5, 1000);
        assert_eq!(b1.as_millis(), 5);

        let b3 = calculate_backoff(3, 100, 2000);
        assert!(b3.as_millis() >= 400 && b3.as_millis() < 440);

        let max = calculate_backoff(20, 5, 1000);
        assert!(max.as_millis() >= 1000 && max.as_millis() < 1100);
    }
}
