use time::OffsetDateTime;

/// Time source behind all staleness and reconciliation arithmetic.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[cfg(feature = "mock")]
pub use manual::ManualClock;

#[cfg(feature = "mock")]
mod manual {
    use std::sync::Mutex;
    use std::time::Duration;

    use time::OffsetDateTime;

    use super::Clock;

    /// Settable clock for deterministic tests.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<OffsetDateTime>,
    }

    impl ManualClock {
        pub fn new(start: OffsetDateTime) -> Self {
            Self {
                now: Mutex::new(start),
            }
        }

        pub fn set(&self, now: OffsetDateTime) {
            *self.now.lock().unwrap() = now;
        }

        pub fn advance(&self, delta: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += time::Duration::milliseconds(delta.as_millis() as i64);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> OffsetDateTime {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }

    #[cfg(feature = "mock")]
    #[test]
    fn test_manual_clock_advances() {
        use std::time::Duration;

        let clock = ManualClock::new(OffsetDateTime::UNIX_EPOCH);
        clock.advance(Duration::from_millis(750));

        assert_eq!(
            clock.now() - OffsetDateTime::UNIX_EPOCH,
            time::Duration::milliseconds(750)
        );
    }
}
