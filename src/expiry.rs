//! Expiry timestamps from compact duration strings such as `"3d2h"`.
//!
//! A duration string is scanned for `<digits><unit>` tokens, with unit one
//! of `s`, `m`, `h`, `d` or `w`. Anything that is not part of a token is
//! ignored, so `"1d junk"` means one day and `"soon"` means nothing.

use chrono::{DateTime, TimeDelta, TimeZone};
use tracing::debug;

/// Unit suffix of a duration token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
}

impl DurationUnit {
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::Second),
            'm' => Some(Self::Minute),
            'h' => Some(Self::Hour),
            'd' => Some(Self::Day),
            'w' => Some(Self::Week),
            _ => None,
        }
    }

    /// Length of one unit in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 60 * 60,
            Self::Day => 24 * 60 * 60,
            Self::Week => 7 * 24 * 60 * 60,
        }
    }

    /// `value` units as a [`TimeDelta`], or `None` if out of range.
    pub fn delta(self, value: u64) -> Option<TimeDelta> {
        let secs = i64::try_from(value).ok()?.checked_mul(self.seconds())?;
        TimeDelta::try_seconds(secs)
    }
}

impl std::fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match self {
            Self::Second => "s",
            Self::Minute => "m",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Week => "w",
        };
        f.write_str(suffix)
    }
}

/// Iterator over the `(value, unit)` tokens of a duration string.
///
/// Created by [`duration_tokens`].
#[derive(Debug, Clone)]
pub struct DurationTokens<'a> {
    rest: &'a str,
}

/// Scans `duration` left to right for non-overlapping duration tokens.
pub fn duration_tokens(duration: &str) -> DurationTokens<'_> {
    DurationTokens { rest: duration }
}

impl Iterator for DurationTokens<'_> {
    type Item = (u64, DurationUnit);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.rest.find(|c: char| c.is_ascii_digit())?;
            let digits_and_tail = &self.rest[start..];
            let len = digits_and_tail
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits_and_tail.len());
            let (digits, tail) = digits_and_tail.split_at(len);

            // A digit run without a unit cannot start a token at any offset.
            let Some(unit) = tail.chars().next().and_then(DurationUnit::from_suffix) else {
                self.rest = tail;
                continue;
            };
            self.rest = &tail[1..];

            match digits.parse::<u64>() {
                Ok(value) => return Some((value, unit)),
                Err(_) => debug!(digits, %unit, "skipping oversized duration token"),
            }
        }
    }
}

/// Sums every token of `duration` into one [`TimeDelta`].
///
/// Tokens that would overflow the total are skipped.
pub fn parse_duration(duration: &str) -> TimeDelta {
    duration_tokens(duration).fold(TimeDelta::zero(), |total, (value, unit)| {
        match unit.delta(value).and_then(|d| total.checked_add(&d)) {
            Some(total) => total,
            None => {
                debug!(value, %unit, "skipping duration token out of range");
                total
            }
        }
    })
}

/// Returns `base` advanced by every duration token in `duration`.
///
/// An empty string, or one without any token, returns `base` unchanged. A token
/// that would move the timestamp out of range is skipped.
///
/// # Example
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use keyring_verify::compute_expiry;
///
/// let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// let expiry = compute_expiry(created, "2w3d");
/// assert_eq!(expiry - created, TimeDelta::days(17));
/// ```
pub fn compute_expiry<Tz: TimeZone>(base: DateTime<Tz>, duration: &str) -> DateTime<Tz> {
    duration_tokens(duration).fold(base, |expiry, (value, unit)| {
        match unit
            .delta(value)
            .and_then(|d| expiry.clone().checked_add_signed(d))
        {
            Some(next) => next,
            None => {
                debug!(value, %unit, "skipping duration token out of range");
                expiry
            }
        }
    })
}
