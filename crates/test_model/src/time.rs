use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A point in time captured on both the monotonic and wall clocks.
///
/// `absolute` is measured from a process-local anchor and is only meaningful
/// for ordering and durations inside the producing process; `since_1970` is
/// the wall-clock reading for cross-process correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant {
    pub absolute: Duration,
    pub since_1970: Duration,
}

fn monotonic_anchor() -> Instant {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    *ANCHOR.get_or_init(Instant::now)
}

impl TestInstant {
    pub fn now() -> Self {
        let absolute = monotonic_anchor().elapsed();
        let since_1970 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self {
            absolute,
            since_1970,
        }
    }

    pub fn from_parts(absolute: Duration, since_1970: Duration) -> Self {
        Self {
            absolute,
            since_1970,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instants_are_monotonic_within_a_process() {
        let first = TestInstant::now();
        let second = TestInstant::now();
        assert!(second.absolute >= first.absolute);
    }
}
