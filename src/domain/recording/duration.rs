//! Answer length limit value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default auto-stop limit for a practice answer (60 seconds)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 60;

/// Longest limit accepted (30 minutes)
pub const MAX_ALLOWED_SECS: u64 = 30 * 60;

/// Whole-second duration written as `30s`, `1m` or `2m30s`.
/// Always positive and at most `MAX_ALLOWED_SECS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    seconds: u64,
}

impl Duration {
    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self { seconds: secs }
    }

    /// Default auto-stop limit (60 seconds)
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    pub const fn as_millis(&self) -> u64 {
        self.seconds * 1000
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }

    /// Time left before the limit, zero once it has passed
    pub fn remaining(&self, elapsed: StdDuration) -> StdDuration {
        self.as_std().saturating_sub(elapsed)
    }
}

/// Split `"2m30s"` into `[(2, 'm'), (30, 's')]`
fn segments(input: &str) -> Option<Vec<(u64, char)>> {
    let mut out = Vec::new();
    let mut digits = String::new();
    for ch in input.chars() {
        match ch {
            '0'..='9' => digits.push(ch),
            'm' | 's' if !digits.is_empty() => {
                out.push((digits.parse().ok()?, ch));
                digits.clear();
            }
            _ => return None,
        }
    }
    if !digits.is_empty() || out.is_empty() {
        return None;
    }
    Some(out)
}

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let parts = segments(&s.trim().to_lowercase()).ok_or_else(err)?;

        let seconds = match parts.as_slice() {
            [(m, 'm')] => m.checked_mul(60),
            [(secs, 's')] => Some(*secs),
            [(m, 'm'), (secs, 's')] => m.checked_mul(60).and_then(|m| m.checked_add(*secs)),
            _ => None,
        }
        .ok_or_else(err)?;

        if seconds == 0 || seconds > MAX_ALLOWED_SECS {
            return Err(err());
        }
        Ok(Self { seconds })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.seconds / 60, self.seconds % 60) {
            (0, secs) => write!(f, "{}s", secs),
            (mins, 0) => write!(f, "{}m", mins),
            (mins, secs) => write!(f, "{}m{}s", mins, secs),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_max_duration()
    }
}
