// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTPv4 packet codec.
//!
//! This crate provides the wire-level half of a single-sample NTP client (RFC 5905): the
//! 48-byte [`Packet`](protocol::Packet) with its bit-packed and fixed-point fields, the
//! conversion between 32.32 timestamps and UTC instants, and the offset / round-trip
//! arithmetic over the four exchange timestamps.
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use ntp_proto::protocol::Packet;
//!
//! let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let mut reply = Packet::empty();
//! reply.set_origin_timestamp(Some(t1));
//! reply.set_receive_timestamp(Some(t1 + TimeDelta::milliseconds(50)));
//! reply.set_transmit_timestamp(Some(t1 + TimeDelta::milliseconds(60)));
//! reply.set_destination_timestamp(Some(t1 + TimeDelta::milliseconds(120)));
//!
//! assert_eq!(reply.round_trip_time().unwrap(), TimeDelta::milliseconds(110));
//! assert_eq!(reply.correction_offset().unwrap(), TimeDelta::milliseconds(-5));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error types for packet construction, field validation and timing evaluation.
pub mod error;

/// NTP packet types and constants (RFC 5905).
pub mod protocol;

/// NTP timestamp conversion utilities.
///
/// Converts between the 32.32 fixed-point [`protocol::TimestampFormat`] (seconds since
/// 1900-01-01) and `chrono::DateTime<Utc>`.
pub mod ntp_time;
