//! Types and constants of the NTPv4 packet.
//!
//! [`Packet`] is a view over the 48-byte wire buffer: every accessor reads or writes the bytes
//! directly, so the buffer is always ready to send. [`FromBytes`] and [`ToBytes`] move the
//! fixed-size pieces in and out of plain byte slices in network byte order.
//!
//! Documentation is largely derived (and often copied directly) from IETF RFC 5905.

/// NTP port number.
pub const PORT: u16 = 123;

/// NTP version number written into new requests.
pub const VERSION: u8 = 4;

mod bytes;
mod packet;
mod traits;
mod types;

pub use self::packet::*;
pub use self::traits::*;
pub use self::types::*;
