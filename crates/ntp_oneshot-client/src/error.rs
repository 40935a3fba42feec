// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Custom error types for the NTP client.
//!
//! All public APIs return `io::Result<T>`. Internally, errors are constructed as `NtpError`
//! variants and converted to `io::Error` via `From<NtpError> for io::Error`.
//!
//! Callers who want programmatic error matching can downcast via `io::Error::get_ref()`:
//!
//! ```no_run
//! use ntp_client::error::{NtpError, TimeoutError};
//!
//! match ntp_client::request("time.nist.gov:123") {
//!     Ok(reply) => println!("offset: {:?}", reply.correction_offset()),
//!     Err(e) => {
//!         if let Some(ntp_err) = e.get_ref().and_then(|inner| inner.downcast_ref::<NtpError>()) {
//!             match ntp_err {
//!                 NtpError::Timeout(TimeoutError::Recv) => eprintln!("no reply in time"),
//!                 _ => eprintln!("NTP error: {ntp_err}"),
//!             }
//!         }
//!     }
//! }
//! ```

pub use ntp_proto::error::{PacketError, TimestampField};

use std::fmt;
use std::io;
use std::time::Duration;

/// Errors that can occur during NTP client operations.
#[derive(Debug)]
pub enum NtpError {
    /// The reply could not be decoded, or the exchange is missing a timestamp.
    Packet(PacketError),
    /// Operation timed out.
    Timeout(TimeoutError),
    /// Invalid configuration or client state.
    Config(ConfigError),
    /// Underlying I/O error (socket bind, DNS resolution, etc.).
    Io(io::Error),
}

/// Timeout errors for NTP operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeoutError {
    /// NTP send operation timed out.
    Send,
    /// NTP receive operation timed out.
    Recv,
}

/// Configuration errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// The builder was finished without a server.
    NoServer,
    /// Address resolved to no socket addresses.
    NoAddresses {
        /// The address that failed to resolve.
        address: String,
    },
    /// Receive timeout below [`MIN_TIMEOUT`](crate::config::MIN_TIMEOUT).
    TimeoutTooShort {
        /// The rejected timeout.
        requested: Duration,
    },
    /// The client has been closed.
    Closed,
}

// ── Display implementations ─────────────────────────────────────────

impl fmt::Display for NtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NtpError::Packet(e) => write!(f, "NTP packet error: {e}"),
            NtpError::Timeout(e) => write!(f, "NTP timeout: {e}"),
            NtpError::Config(e) => write!(f, "NTP config error: {e}"),
            NtpError::Io(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutError::Send => write!(f, "NTP send timed out"),
            TimeoutError::Recv => write!(f, "NTP recv timed out"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoServer => write!(f, "a server address is required"),
            ConfigError::NoAddresses { address } => {
                write!(f, "address resolved to no socket addresses: {address}")
            }
            ConfigError::TimeoutTooShort { requested } => {
                write!(f, "timeout must be at least 1ms, got {requested:?}")
            }
            ConfigError::Closed => write!(f, "client is closed"),
        }
    }
}

// ── Error trait implementations ─────────────────────────────────────

impl std::error::Error for NtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NtpError::Packet(e) => Some(e),
            NtpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for TimeoutError {}
impl std::error::Error for ConfigError {}

// ── From conversions ────────────────────────────────────────────────

impl From<NtpError> for io::Error {
    fn from(err: NtpError) -> io::Error {
        let kind = match &err {
            NtpError::Packet(PacketError::BufferTooShort { .. }) => io::ErrorKind::UnexpectedEof,
            NtpError::Packet(PacketError::InvalidField { .. }) => io::ErrorKind::InvalidInput,
            NtpError::Packet(PacketError::MissingTimestamp(_)) => io::ErrorKind::InvalidData,
            NtpError::Timeout(_) => io::ErrorKind::TimedOut,
            NtpError::Config(ConfigError::Closed) => io::ErrorKind::NotConnected,
            NtpError::Config(_) => io::ErrorKind::InvalidInput,
            NtpError::Io(e) => e.kind(),
        };
        // Preserve the original io::Error directly for the Io variant.
        if let NtpError::Io(e) = err {
            return e;
        }
        io::Error::new(kind, err)
    }
}

impl From<io::Error> for NtpError {
    fn from(err: io::Error) -> NtpError {
        NtpError::Io(err)
    }
}

impl From<PacketError> for NtpError {
    fn from(err: PacketError) -> NtpError {
        NtpError::Packet(err)
    }
}

impl From<TimeoutError> for NtpError {
    fn from(err: TimeoutError) -> NtpError {
        NtpError::Timeout(err)
    }
}

impl From<ConfigError> for NtpError {
    fn from(err: ConfigError) -> NtpError {
        NtpError::Config(err)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_display() {
        assert_eq!(TimeoutError::Send.to_string(), "NTP send timed out");
        assert_eq!(TimeoutError::Recv.to_string(), "NTP recv timed out");
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::NoServer.to_string(),
            "a server address is required"
        );
        let e = ConfigError::TimeoutTooShort {
            requested: Duration::ZERO,
        };
        assert_eq!(e.to_string(), "timeout must be at least 1ms, got 0ns");
        assert_eq!(ConfigError::Closed.to_string(), "client is closed");
    }

    #[test]
    fn test_packet_error_display() {
        let e = NtpError::Packet(PacketError::MissingTimestamp(TimestampField::Destination));
        assert_eq!(
            e.to_string(),
            "NTP packet error: destination timestamp is not set"
        );
    }

    #[test]
    fn test_ntp_error_to_io_error_kind() {
        let cases: Vec<(NtpError, io::ErrorKind)> = vec![
            (
                NtpError::Packet(PacketError::BufferTooShort {
                    needed: 48,
                    available: 12,
                }),
                io::ErrorKind::UnexpectedEof,
            ),
            (
                NtpError::Packet(PacketError::MissingTimestamp(TimestampField::Origin)),
                io::ErrorKind::InvalidData,
            ),
            (
                NtpError::Timeout(TimeoutError::Recv),
                io::ErrorKind::TimedOut,
            ),
            (
                NtpError::Config(ConfigError::NoServer),
                io::ErrorKind::InvalidInput,
            ),
            (
                NtpError::Config(ConfigError::TimeoutTooShort {
                    requested: Duration::ZERO,
                }),
                io::ErrorKind::InvalidInput,
            ),
            (
                NtpError::Config(ConfigError::Closed),
                io::ErrorKind::NotConnected,
            ),
        ];
        for (ntp_err, expected_kind) in cases {
            let io_err: io::Error = ntp_err.into();
            assert_eq!(io_err.kind(), expected_kind);
        }
    }

    #[test]
    fn test_ntp_error_downcast_roundtrip() {
        let err = NtpError::Timeout(TimeoutError::Recv);
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);

        let inner = io_err
            .get_ref()
            .unwrap()
            .downcast_ref::<NtpError>()
            .unwrap();
        assert!(matches!(inner, NtpError::Timeout(TimeoutError::Recv)));
    }

    #[test]
    fn test_io_error_passthrough() {
        let orig = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let kind = orig.kind();
        let io_err: io::Error = NtpError::Io(orig).into();
        assert_eq!(io_err.kind(), kind);
        assert_eq!(io_err.to_string(), "reset");
    }

    #[test]
    fn test_from_io_error() {
        let orig = io::Error::new(io::ErrorKind::BrokenPipe, "broken");
        let ntp_err: NtpError = orig.into();
        assert!(matches!(ntp_err, NtpError::Io(_)));
    }
}
