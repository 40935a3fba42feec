// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! A one-shot NTP client: one request datagram out, one reply datagram in.
//!
//! The client does not retry, does not check that the reply answers its request, and keeps
//! no history between queries. Each query returns the server's reply with the exchange
//! completed locally, so the caller can evaluate it with
//! [`Packet::correction_offset`] and [`Packet::round_trip_time`].

use chrono::TimeDelta;
use log::{debug, trace};

use crate::channel::{self, DatagramChannel};
use crate::config::{self, DEFAULT_TIMEOUT, NtpClientBuilder};
use crate::error::{ConfigError, NtpError, TimeoutError};
use crate::ntp_time;
use crate::protocol::Packet;
use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

/// Receive buffer size. Longer datagrams are truncated to this many bytes.
const RECV_BUFFER_SIZE: usize = 1024;

/// A synchronous NTP client bound to one server.
///
/// The channel is owned by the client and released on [`close`](Self::close) or drop.
/// Queries take `&mut self`, so one client never has two exchanges in flight.
#[derive(Debug)]
pub struct NtpClient<C: DatagramChannel = UdpSocket> {
    channel: Option<C>,
    timeout: Duration,
    peer: Option<SocketAddr>,
}

impl NtpClient {
    /// Resolve `addr`, connect a UDP socket to the first address and apply the default
    /// 15s receive timeout.
    ///
    /// Fails with [`ConfigError::NoAddresses`] if resolution yields nothing.
    pub fn connect<A: ToSocketAddrs + fmt::Debug>(addr: A) -> io::Result<NtpClient> {
        let target = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                NtpError::Config(ConfigError::NoAddresses {
                    address: format!("{addr:?}"),
                })
            })?;
        let socket = channel::connect_udp(target)?;
        let mut client = NtpClient::with_channel(socket)?;
        client.peer = Some(target);
        Ok(client)
    }

    /// Create a builder for configuring an NTP client.
    pub fn builder() -> NtpClientBuilder {
        NtpClientBuilder::new()
    }
}

impl<C: DatagramChannel> NtpClient<C> {
    /// Wrap an already connected channel and apply the default 15s receive timeout.
    pub fn with_channel(channel: C) -> io::Result<Self> {
        channel.set_read_timeout(DEFAULT_TIMEOUT)?;
        Ok(NtpClient {
            channel: Some(channel),
            timeout: DEFAULT_TIMEOUT,
            peer: None,
        })
    }

    /// The current receive timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Change the receive timeout.
    ///
    /// Timeouts below 1ms fail with [`ConfigError::TimeoutTooShort`] and leave both the
    /// client and its channel untouched.
    pub fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        let timeout = config::validate_timeout(timeout).map_err(NtpError::from)?;
        if let Some(channel) = &self.channel {
            channel.set_read_timeout(timeout)?;
        }
        trace!("receive timeout {:?} -> {:?}", self.timeout, timeout);
        self.timeout = timeout;
        Ok(())
    }

    /// The server address, when the client was created by [`NtpClient::connect`].
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.channel.is_none()
    }

    /// Send a fresh client request stamped with the current time and return the reply.
    pub fn query(&mut self) -> io::Result<Packet> {
        self.query_with(&Packet::new())
    }

    /// Send `request` and return the server's reply with the exchange completed.
    ///
    /// The reply's origin timestamp is replaced by the request's, and its destination
    /// timestamp is the local time the reply arrived. No other validation is performed.
    ///
    /// Bytes past the 48-byte header are kept as extension bytes, up to a total datagram
    /// size of 1024 bytes. Anything beyond that is discarded by the receive without notice.
    ///
    /// # Errors
    ///
    /// - [`TimeoutError::Recv`] if nothing arrives within the timeout
    /// - [`PacketError::BufferTooShort`](crate::error::PacketError::BufferTooShort) if the
    ///   reply is shorter than 48 bytes
    /// - [`ConfigError::Closed`] after [`close`](Self::close)
    pub fn query_with(&mut self, request: &Packet) -> io::Result<Packet> {
        let channel = self
            .channel
            .as_ref()
            .ok_or(NtpError::Config(ConfigError::Closed))?;

        let sent = channel
            .send(request.as_bytes())
            .map_err(timeout_as(TimeoutError::Send))?;
        debug!("sent: {}", sent);
        if sent != request.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("sent {} of {} request bytes", sent, request.len()),
            ));
        }

        let mut recv_buf = [0u8; RECV_BUFFER_SIZE];
        let recv_len = channel
            .recv(&mut recv_buf)
            .map_err(timeout_as(TimeoutError::Recv))?;
        // Record T4 (destination timestamp) immediately.
        let t4 = ntp_time::now();

        let mut reply = Packet::from_bytes(&recv_buf[..recv_len]).map_err(NtpError::from)?;
        reply.set_origin_timestamp(request.origin_timestamp());
        reply.set_destination_timestamp(Some(t4));
        debug!("recv: {} bytes: {}", recv_len, reply);
        Ok(reply)
    }

    /// Query the server and return how far the local clock should be moved.
    ///
    /// Positive means the local clock is behind the server.
    pub fn correction_offset(&mut self) -> io::Result<TimeDelta> {
        let reply = self.query()?;
        let offset = reply.correction_offset().map_err(NtpError::from)?;
        Ok(offset)
    }

    /// Release the channel. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.channel.take().is_some() {
            debug!("closed client for {:?}", self.peer);
        }
    }
}

/// Map a read/write timeout onto the matching [`TimeoutError`].
fn timeout_as(which: TimeoutError) -> impl FnOnce(io::Error) -> io::Error {
    move |e| match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => NtpError::Timeout(which).into(),
        _ => e,
    }
}

/// Send a blocking request to an NTP server and return its reply.
///
/// Uses the default 15s receive timeout. The reply carries all four exchange timestamps,
/// so the offset is one call away:
///
/// ```no_run
/// let reply = ntp_client::request("time.nist.gov:123")?;
/// println!("offset: {}", reply.correction_offset()?);
/// println!("delay: {}", reply.round_trip_time()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn request<A: ToSocketAddrs + fmt::Debug>(addr: A) -> io::Result<Packet> {
    request_with_timeout(addr, DEFAULT_TIMEOUT)
}

/// Like [`request`], with a custom receive timeout.
///
/// The timeout is validated before the address is resolved.
pub fn request_with_timeout<A: ToSocketAddrs + fmt::Debug>(
    addr: A,
    timeout: Duration,
) -> io::Result<Packet> {
    config::validate_timeout(timeout).map_err(NtpError::from)?;
    let mut client = NtpClient::connect(addr)?;
    client.set_timeout(timeout)?;
    client.query()
}
