//! Time primitives for Poise
//!
//! All timestamps are wall-clock microseconds since the UNIX epoch.
//! Entry points take `now` explicitly; only the scheduler reads the clock.

use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// State time - microseconds since the UNIX epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StateTime(pub i64);

impl StateTime {
    pub const ZERO: StateTime = StateTime(0);

    /// Current wall-clock time
    pub fn now() -> Self {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => StateTime(elapsed.as_micros() as i64),
            Err(before) => StateTime(-(before.duration().as_micros() as i64)),
        }
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        StateTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        StateTime(self.0.saturating_add(duration.as_micros() as i64))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        StateTime(self.0.saturating_sub(duration.as_micros() as i64))
    }

    /// UTC calendar time, if representable
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_micros(self.0)
    }

    /// ISO-8601 rendering with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`
    pub fn to_rfc3339(self) -> String {
        self.to_utc()
            .map(|utc| utc.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| "1970-01-01T00:00:00.000Z".to_string())
    }

    /// Local wall-clock time of day (`HH:MM:SS`)
    pub fn local_time_of_day(self) -> String {
        self.to_utc()
            .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }
}

impl Add<Duration> for StateTime {
    type Output = StateTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Duration> for StateTime {
    type Output = StateTime;

    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Sub<StateTime> for StateTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: StateTime) -> Self::Output {
        let diff = self.0.saturating_sub(rhs.0);
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for StateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.as_millis())
    }
}

/// Observation window - the trailing interval `[now - horizon, now]`
#[derive(Clone, Copy, Debug)]
pub struct ObservationWindow {
    /// Current time
    pub now: StateTime,
    /// How far back observations remain relevant
    pub horizon: Duration,
}

impl ObservationWindow {
    pub fn new(now: StateTime, horizon: Duration) -> Self {
        ObservationWindow { now, horizon }
    }

    /// Oldest timestamp still inside the window
    #[inline]
    pub fn left(&self) -> StateTime {
        self.now.saturating_sub(self.horizon)
    }

    /// Anything at or after the left bound is kept, including timestamps ahead of `now`
    #[inline]
    pub fn retains(&self, t: StateTime) -> bool {
        t >= self.left()
    }
}
