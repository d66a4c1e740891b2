//! Wall-clock timestamps and deadlines.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Seconds since the UNIX epoch.
///
/// Used both for the clock reading and for caller-supplied deadlines.  A
/// call is valid while `now <= deadline`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wraps raw seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Returns raw seconds.
    #[must_use]
    pub const fn secs(&self) -> u64 {
        self.0
    }

    /// Returns `self + secs`, saturating at `u64::MAX`.
    #[must_use]
    pub const fn plus(&self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }

    /// Returns `true` if `now` is strictly after this deadline.
    #[must_use]
    pub const fn has_passed(&self, now: Timestamp) -> bool {
        now.0 > self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
