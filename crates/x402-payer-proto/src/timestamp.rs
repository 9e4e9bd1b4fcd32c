//! Unix timestamps as used in transfer authorizations.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::ops::Add;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch.
///
/// Serializes as a plain number; the payment-proof envelope carries it as a
/// decimal string instead (see [`crate::proto`]), which is why it also
/// implements [`Display`](fmt::Display) and [`FromStr`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnixTimestamp(u64);

impl UnixTimestamp {
    /// The epoch itself; used as `validAfter` for immediately-valid authorizations.
    pub const ZERO: UnixTimestamp = UnixTimestamp(0);

    pub const fn from_secs(secs: u64) -> Self {
        UnixTimestamp(secs)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        UnixTimestamp(secs)
    }
}

impl Add<u64> for UnixTimestamp {
    type Output = UnixTimestamp;

    fn add(self, rhs: u64) -> Self::Output {
        UnixTimestamp(self.0.saturating_add(rhs))
    }
}

impl From<u64> for UnixTimestamp {
    fn from(secs: u64) -> Self {
        UnixTimestamp(secs)
    }
}

impl From<UnixTimestamp> for U256 {
    fn from(value: UnixTimestamp) -> Self {
        U256::from(value.0)
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for UnixTimestamp {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(UnixTimestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_as_number() {
        let ts = UnixTimestamp::from_secs(1_700_000_000);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1700000000");
        let back: UnixTimestamp = serde_json::from_str("1700000000").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_ordering_and_add() {
        let ts = UnixTimestamp::from_secs(100);
        assert!(ts < ts + 1);
        assert_eq!((ts + 60).as_secs(), 160);
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let ts = UnixTimestamp::from_secs(42);
        assert_eq!(ts.to_string().parse::<UnixTimestamp>().unwrap(), ts);
    }
}
