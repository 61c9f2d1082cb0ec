use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    started_at: Instant,
    suppressed: u64,
}

/// Rate-limits repeated log lines per key.
///
/// A burst of 401s makes every in-flight request refresh on its own, and each
/// failed refresh would otherwise log the same warning.
#[derive(Debug)]
pub struct LogThrottle {
    interval: Duration,
    windows: Mutex<HashMap<&'static str, Window>>,
}

impl LogThrottle {
    pub fn new(interval: Duration) -> Self {
        LogThrottle {
            interval,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `Some(suppressed_count)` when a log for `key` should be emitted,
    /// otherwise `None` and the event is counted as suppressed for the active window.
    pub fn should_emit(&self, key: &'static str) -> Option<u64> {
        // A poisoned lock only means another logger panicked; keep logging.
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        match windows.get_mut(key) {
            None => {
                windows.insert(
                    key,
                    Window {
                        started_at: now,
                        suppressed: 0,
                    },
                );
                Some(0)
            }
            Some(window) if now.duration_since(window.started_at) >= self.interval => {
                let suppressed = window.suppressed;
                window.started_at = now;
                window.suppressed = 0;
                Some(suppressed)
            }
            Some(window) => {
                window.suppressed += 1;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LogThrottle;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn emits_then_suppresses_then_emits_with_count() {
        let throttle = LogThrottle::new(Duration::from_millis(20));
        let key = "client.refresh.failed";

        assert_eq!(throttle.should_emit(key), Some(0));
        assert_eq!(throttle.should_emit(key), None);
        assert_eq!(throttle.should_emit(key), None);

        sleep(Duration::from_millis(30));
        assert_eq!(throttle.should_emit(key), Some(2));
    }

    #[test]
    fn keys_are_independent() {
        let throttle = LogThrottle::new(Duration::from_secs(60));
        assert_eq!(throttle.should_emit("a"), Some(0));
        assert_eq!(throttle.should_emit("b"), Some(0));
        assert_eq!(throttle.should_emit("a"), None);
    }
}
