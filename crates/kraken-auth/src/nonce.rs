//! Nonce generation
//!
//! Kraken requires every private request to carry a nonce that is strictly
//! greater than the previous one used with the same API key. Nonces here are
//! wall clock timestamps at microsecond resolution: the seconds since the
//! Unix epoch followed by exactly six microsecond digits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MICROS_PER_SEC: u64 = 1_000_000;

/// A clock reading at microsecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    /// Whole seconds since the Unix epoch
    pub secs: u64,
    /// Microseconds within the second
    pub micros: u32,
}

impl Timestamp {
    /// Create a timestamp, carrying excess microseconds into the seconds
    ///
    /// Readings past `u64::MAX` microseconds saturate.
    pub fn new(secs: u64, micros: u32) -> Self {
        Self::from_micros(
            secs.saturating_mul(MICROS_PER_SEC)
                .saturating_add(u64::from(micros)),
        )
    }

    /// Create a timestamp from a total microsecond count
    pub fn from_micros(total: u64) -> Self {
        Self {
            secs: total / MICROS_PER_SEC,
            micros: (total % MICROS_PER_SEC) as u32,
        }
    }

    /// Total microseconds since the Unix epoch, saturating at `u64::MAX`
    pub fn as_micros(&self) -> u64 {
        self.secs
            .saturating_mul(MICROS_PER_SEC)
            .saturating_add(u64::from(self.micros))
    }

    /// Truncate a duration since the epoch to microsecond resolution
    pub fn from_duration(since_epoch: Duration) -> Self {
        Self {
            secs: since_epoch.as_secs(),
            micros: since_epoch.subsec_micros(),
        }
    }

    /// Render this reading as a nonce
    pub fn to_nonce(&self) -> String {
        format_nonce(self.secs, self.micros)
    }
}

/// Format a nonce from a clock reading
///
/// The result is `secs` followed by `micros` left-padded to six digits, so
/// `(1616492376, 594)` becomes `"1616492376000594"`. A `micros` value of one
/// second or more carries into `secs`, which keeps the output ordered the
/// same way as the readings. The carried seconds saturate at `u64::MAX`.
pub fn format_nonce(secs: u64, micros: u32) -> String {
    let secs = secs.saturating_add(u64::from(micros) / MICROS_PER_SEC);
    let micros = u64::from(micros) % MICROS_PER_SEC;
    format!("{}{:06}", secs, micros)
}

/// Source of time for nonce generation
pub trait Clock: Send + Sync {
    /// Read the current time
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by [`SystemTime`]
///
/// Sub-microsecond digits are truncated. On platforms whose clock is coarser
/// than a microsecond, two readings taken close together can be equal; wrap
/// it in [`MonotonicClock`] when that matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A clock set before 1970 reads as the epoch
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::from_duration(since_epoch)
    }
}

/// Clock adapter that never returns the same reading twice
///
/// Each reading is the later of the inner clock and one microsecond past
/// the previous reading. This covers coarse clocks, bursts of requests in
/// the same microsecond and small backwards steps of the wall clock.
#[derive(Debug, Default)]
pub struct MonotonicClock<C = SystemClock> {
    inner: C,
    last_micros: AtomicU64,
}

impl<C: Clock> MonotonicClock<C> {
    /// Wrap a clock
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            last_micros: AtomicU64::new(0),
        }
    }

    /// The wrapped clock
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> Timestamp {
        let observed = self.inner.now().as_micros();
        let previous = self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(observed.max(last.saturating_add(1)))
            })
            // The closure always returns Some
            .unwrap_or_else(|last| last);
        Timestamp::from_micros(observed.max(previous.saturating_add(1)))
    }
}

/// Clock that always returns the same reading
///
/// Useful for reproducible signatures in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl FixedClock {
    /// Clock frozen at the given seconds and microseconds
    pub fn new(secs: u64, micros: u32) -> Self {
        Self(Timestamp::new(secs, micros))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn numeric_lt(a: &str, b: &str) -> bool {
        a.parse::<u128>().unwrap() < b.parse::<u128>().unwrap()
    }

    #[test]
    fn test_format_pads_micros() {
        assert_eq!(format_nonce(1616492376, 594), "1616492376000594");
        assert_eq!(format_nonce(1616492376, 0), "1616492376000000");
        assert_eq!(format_nonce(1616492376, 999_999), "1616492376999999");
    }

    #[test]
    fn test_format_carries_overflowing_micros() {
        assert_eq!(format_nonce(10, 1_000_000), "11000000");
        assert_eq!(format_nonce(10, 2_500_001), "12500001");
    }

    #[test]
    fn test_extreme_readings_saturate() {
        assert_eq!(
            format_nonce(u64::MAX, 1_000_000),
            format!("{}000000", u64::MAX)
        );

        let far = Timestamp::new(u64::MAX / 1000, 0);
        assert_eq!(far.as_micros(), u64::MAX);
        assert_eq!(Timestamp { secs: u64::MAX, micros: 1 }.as_micros(), u64::MAX);

        let clock = MonotonicClock::new(FixedClock(Timestamp::from_micros(u64::MAX)));
        assert_eq!(clock.now().as_micros(), u64::MAX);
        assert_eq!(clock.now().as_micros(), u64::MAX);
    }

    #[test]
    fn test_nonce_is_numeric() {
        let nonce = SystemClock.now().to_nonce();
        assert!(nonce.chars().all(|c| c.is_ascii_digit()));
        assert!(nonce.len() >= 16);
    }

    #[test]
    fn test_nonce_monotonic_in_reading() {
        let readings = [
            (1616492376, 999_998),
            (1616492376, 999_999),
            (1616492377, 0),
            (1616492377, 1),
            (1616492400, 500),
        ];

        for pair in readings.windows(2) {
            let (s1, m1) = pair[0];
            let (s2, m2) = pair[1];
            assert!(numeric_lt(&format_nonce(s1, m1), &format_nonce(s2, m2)));
        }
    }

    #[test]
    fn test_timestamp_from_duration_truncates() {
        let ts = Timestamp::from_duration(Duration::new(1616492376, 594_999_999));
        assert_eq!(ts, Timestamp::new(1616492376, 594_999));
    }

    #[test]
    fn test_monotonic_clock_over_frozen_clock() {
        let clock = MonotonicClock::new(FixedClock::new(1616492376, 594));
        let first = clock.now();
        let second = clock.now();
        let third = clock.now();

        assert_eq!(first, Timestamp::new(1616492376, 594));
        assert_eq!(second, Timestamp::new(1616492376, 595));
        assert_eq!(third, Timestamp::new(1616492376, 596));
    }

    #[test]
    fn test_monotonic_clock_concurrent_readings_unique() {
        let clock = Arc::new(MonotonicClock::new(FixedClock::new(1616492376, 0)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let clock = Arc::clone(&clock);
                thread::spawn(move || (0..250).map(|_| clock.now().as_micros()).collect::<Vec<_>>())
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1000);
    }
}
