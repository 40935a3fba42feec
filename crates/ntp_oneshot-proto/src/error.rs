// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the NTP packet codec.
//!
//! [`PacketError`] covers the three ways codec operations can fail: a buffer
//! that is too short to hold a packet, a field value outside its domain, and
//! a derived metric requested before all of its timestamps are present. It
//! converts into [`std::io::Error`] so the client can surface it through
//! `io::Result` like every other failure.

use core::fmt;

/// Identifies one of the timestamps that take part in an NTP exchange.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TimestampField {
    /// Time the server clock was last set or corrected (on the wire, offset 16).
    Reference,
    /// T1: time the request left the client (on the wire, offset 24).
    Origin,
    /// T2: time the request reached the server (on the wire, offset 32).
    Receive,
    /// T3: time the reply left the server (on the wire, offset 40).
    Transmit,
    /// T4: time the reply reached the client. Local only, never on the wire.
    Destination,
}

impl fmt::Display for TimestampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimestampField::Reference => "reference",
            TimestampField::Origin => "origin",
            TimestampField::Receive => "receive",
            TimestampField::Transmit => "transmit",
            TimestampField::Destination => "destination",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building, decoding or evaluating an NTP packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PacketError {
    /// The buffer is too short to hold the expected data.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// A value outside the domain of the field it was meant for.
    InvalidField {
        /// Name of the field that was invalid.
        field: &'static str,
        /// The invalid value.
        value: u32,
    },
    /// Offset or delay requested while one of the four exchange timestamps is unset.
    MissingTimestamp(TimestampField),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            PacketError::InvalidField { field, value } => {
                write!(f, "invalid {} value: {}", field, value)
            }
            PacketError::MissingTimestamp(field) => {
                write!(f, "{} timestamp is not set", field)
            }
        }
    }
}

impl From<PacketError> for std::io::Error {
    fn from(err: PacketError) -> std::io::Error {
        let kind = match &err {
            PacketError::BufferTooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            PacketError::InvalidField { .. } => std::io::ErrorKind::InvalidInput,
            PacketError::MissingTimestamp(_) => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

impl std::error::Error for PacketError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_buffer_too_short() {
        let err = PacketError::BufferTooShort {
            needed: 48,
            available: 10,
        };
        assert_eq!(err.to_string(), "buffer too short: needed 48 bytes, got 10");
    }

    #[test]
    fn test_display_invalid_field() {
        let err = PacketError::InvalidField {
            field: "version number",
            value: 9,
        };
        assert_eq!(err.to_string(), "invalid version number value: 9");
    }

    #[test]
    fn test_display_missing_timestamp() {
        let err = PacketError::MissingTimestamp(TimestampField::Destination);
        assert_eq!(err.to_string(), "destination timestamp is not set");
    }

    #[test]
    fn test_into_io_error() {
        let cases = [
            (
                PacketError::BufferTooShort {
                    needed: 48,
                    available: 0,
                },
                std::io::ErrorKind::UnexpectedEof,
            ),
            (
                PacketError::InvalidField {
                    field: "association mode",
                    value: 7,
                },
                std::io::ErrorKind::InvalidInput,
            ),
            (
                PacketError::MissingTimestamp(TimestampField::Origin),
                std::io::ErrorKind::InvalidData,
            ),
        ];
        for (err, kind) in cases {
            let io_err: std::io::Error = err.clone().into();
            assert_eq!(io_err.kind(), kind);
            let inner = io_err
                .get_ref()
                .and_then(|e| e.downcast_ref::<PacketError>())
                .unwrap();
            assert_eq!(*inner, err);
        }
    }
}
