// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Conversion between NTP 32.32 fixed-point timestamps and UTC instants.
//!
//! The arithmetic is integer-only: the fraction is scaled by `10^9 / 2^32` with round-to-nearest
//! in both directions, so any instant with nanosecond precision inside era 0 (1900-01-01 to
//! 2036-02-07) survives an encode/decode round trip unchanged.

use chrono::{DateTime, TimeDelta, Utc};

use crate::protocol::TimestampFormat;

/// The number of seconds from 1st January 1900 UTC to the start of the Unix epoch.
pub const EPOCH_DELTA: i64 = 2_208_988_800;

/// The number of seconds in one NTP era (2^32 seconds, approximately 136 years).
pub const ERA_SECONDS: i64 = 1 << 32;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// 0 h 1 January 1900 UTC, the NTP prime epoch.
pub fn prime_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH - TimeDelta::seconds(EPOCH_DELTA)
}

/// The current UTC time from the system clock.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Decode a wire timestamp. The all-zero value means "not set" and decodes to `None`.
pub fn timestamp_to_datetime(ts: TimestampFormat) -> Option<DateTime<Utc>> {
    if ts.is_unset() {
        return None;
    }
    let mut secs = ts.seconds as i64;
    let mut nanos = (ts.fraction as u64 * NANOS_PER_SEC + (1 << 31)) >> 32;
    if nanos >= NANOS_PER_SEC {
        if ts.seconds == u32::MAX {
            // Carrying would leave era 0 and re-encode as the "unset" zero value.
            nanos = NANOS_PER_SEC - 1;
        } else {
            secs += 1;
            nanos -= NANOS_PER_SEC;
        }
    }
    Some(prime_epoch() + TimeDelta::seconds(secs) + TimeDelta::nanoseconds(nanos as i64))
}

/// Encode an instant as a wire timestamp.
///
/// The seconds are truncated to 32 bits, so instants outside era 0 wrap into it; the receiver
/// is expected to know which era it is in.
pub fn datetime_to_timestamp(time: DateTime<Utc>) -> TimestampFormat {
    let ntp_secs = time.timestamp() + EPOCH_DELTA;
    // A leap second is reported as nanos >= 10^9; pin it to the end of the second.
    let nanos = (time.timestamp_subsec_nanos() as u64).min(NANOS_PER_SEC - 1);
    let fraction = ((nanos << 32) + NANOS_PER_SEC / 2) / NANOS_PER_SEC;
    TimestampFormat {
        seconds: ntp_secs.rem_euclid(ERA_SECONDS) as u32,
        fraction: fraction.min(u32::MAX as u64) as u32,
    }
}

impl From<DateTime<Utc>> for TimestampFormat {
    fn from(time: DateTime<Utc>) -> Self {
        datetime_to_timestamp(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn prime_epoch_is_1900() {
        assert_eq!(
            prime_epoch(),
            Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn known_timestamp_2024() {
        // 2024-01-01 00:00:00 UTC: Unix=1704067200, NTP=3913056000
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ts = datetime_to_timestamp(time);
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(ts.fraction, 0);
        assert_eq!(timestamp_to_datetime(ts), Some(time));
    }

    #[test]
    fn half_second_fraction() {
        let ts = TimestampFormat {
            seconds: 3_913_056_000,
            fraction: 1 << 31,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time.timestamp(), 1_704_067_200);
        assert_eq!(time.timestamp_subsec_nanos(), 500_000_000);
    }

    #[test]
    fn zero_is_unset() {
        assert_eq!(timestamp_to_datetime(TimestampFormat::default()), None);
    }

    #[test]
    fn max_fraction_carries_into_seconds() {
        let ts = TimestampFormat {
            seconds: 3_913_056_000,
            fraction: u32::MAX,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        assert_eq!(time.timestamp(), 1_704_067_201);
        assert_eq!(time.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn last_nanosecond_does_not_overflow_fraction() {
        let time = Utc.timestamp_opt(1_704_067_200, 999_999_999).unwrap();
        let ts = datetime_to_timestamp(time);
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(timestamp_to_datetime(ts), Some(time));
    }

    #[test]
    fn carry_stops_at_end_of_era0() {
        let ts = TimestampFormat {
            seconds: u32::MAX,
            fraction: u32::MAX,
        };
        let time = timestamp_to_datetime(ts).unwrap();
        let last = prime_epoch() + TimeDelta::seconds(ERA_SECONDS - 1);
        assert_eq!(time, last + TimeDelta::nanoseconds(999_999_999));
        let back = datetime_to_timestamp(time);
        assert_eq!(back.seconds, u32::MAX);
        assert!(!back.is_unset());
        assert_eq!(timestamp_to_datetime(back), Some(time));
    }

    #[test]
    fn from_datetime_matches_encoder() {
        let time = Utc.timestamp_opt(1_704_067_200, 250_000_000).unwrap();
        let ts = TimestampFormat::from(time);
        assert_eq!(ts, datetime_to_timestamp(time));
        assert_eq!(ts.seconds, 3_913_056_000);
        assert_eq!(ts.fraction, 1 << 30);
        let converted: TimestampFormat = time.into();
        assert_eq!(converted, ts);
    }

    #[test]
    fn era1_wraps() {
        // 2036-02-07 06:28:16 UTC is the first second of era 1.
        let time = prime_epoch() + TimeDelta::seconds(ERA_SECONDS + 5);
        let ts = datetime_to_timestamp(time);
        assert_eq!(ts.seconds, 5);
    }
}
