// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Synchronous single-sample NTPv4 client.

Sends one client-mode packet to a server over a connected datagram channel, waits for one
reply, and hands back the reply with the four exchange timestamps filled in. Offset and
round-trip delay are computed from that packet.

# Example
Shows how to ask a server how far off the local clock is.

```rust,no_run
use std::time::Duration;

fn main() -> std::io::Result<()> {
    let mut client = ntp_client::NtpClient::connect("time.nist.gov:123")?;
    client.set_timeout(Duration::from_secs(5))?;

    let reply = client.query()?;
    println!("server time: {:?}", reply.transmit_timestamp());
    println!("offset: {}", reply.correction_offset().map_err(std::io::Error::from)?);
    println!("delay: {}", reply.round_trip_time().map_err(std::io::Error::from)?);

    client.close();
    Ok(())
}
```
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Re-export codec types from ntp_proto for convenience.
pub use ntp_proto::{ntp_time, protocol};

/// Datagram channel abstraction and the UDP implementation.
pub mod channel;

/// The blocking one-shot NTP client.
pub mod client;

/// Client defaults and builder.
pub mod config;

/// Custom error types for the NTP client.
///
/// Provides [`error::NtpError`] and sub-error types for programmatic error matching
/// via `io::Error::get_ref()` and `downcast_ref`.
pub mod error;

pub use channel::DatagramChannel;
pub use client::{NtpClient, request, request_with_timeout};
pub use config::NtpClientBuilder;
