//! Simulated time and scheduled-event handles

use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated time elapsed since the start of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime(Duration);

impl SimTime {
    /// The start of a run
    pub const ZERO: SimTime = SimTime(Duration::ZERO);

    /// Never reached by a run; saturated arithmetic ends here
    pub const MAX: SimTime = SimTime(Duration::MAX);

    pub fn from_duration(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Saturating conversion: negative or NaN input gives zero, values past
    /// the `Duration` range give [`SimTime::MAX`]
    pub fn from_secs_f64(secs: f64) -> Self {
        match Self::try_from_secs_f64(secs) {
            Some(time) => time,
            None if secs > 0.0 => Self::MAX,
            None => Self::ZERO,
        }
    }

    /// `None` for negative, NaN or out-of-range input
    pub fn try_from_secs_f64(secs: f64) -> Option<Self> {
        if secs < 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(secs).ok().map(Self)
    }

    /// `None` if the sum leaves the representable range
    pub fn checked_add(self, rhs: Duration) -> Option<SimTime> {
        self.0.checked_add(rhs).map(Self)
    }

    pub fn as_duration(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn since(self, earlier: SimTime) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

/// Saturates at [`SimTime::MAX`]
impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0.saturating_add(rhs))
    }
}

impl Sub for SimTime {
    type Output = Duration;

    fn sub(self, rhs: SimTime) -> Duration {
        self.since(rhs)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}s", self.0.as_secs_f64())
    }
}

/// Handle of a scheduled event
///
/// Ids are unique within one scheduler and never reused, so cancelling a
/// stale handle can never hit a different event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ev#{}", self.0)
    }
}
