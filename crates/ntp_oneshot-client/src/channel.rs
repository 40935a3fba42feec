// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The datagram transport an [`NtpClient`](crate::client::NtpClient) talks through.

use log::debug;

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// A connected, message-oriented channel to a single peer.
///
/// Each `send` transmits one whole datagram and each `recv` yields at most one. Implemented
/// for a connected [`UdpSocket`]; tests substitute their own channels.
pub trait DatagramChannel {
    /// Send `buf` as one datagram, returning the number of bytes sent.
    fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Receive one datagram into `buf`, returning its length.
    ///
    /// Must fail with [`io::ErrorKind::WouldBlock`] or [`io::ErrorKind::TimedOut`] when the
    /// read timeout elapses.
    fn recv(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Bound how long a single `recv` may block.
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()>;
}

impl DatagramChannel for UdpSocket {
    fn send(&self, buf: &[u8]) -> io::Result<usize> {
        UdpSocket::send(self, buf)
    }

    fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        UdpSocket::recv(self, buf)
    }

    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        UdpSocket::set_read_timeout(self, Some(timeout))
    }
}

/// Select the appropriate bind address based on the target address family.
///
/// Returns `0.0.0.0:0` for IPv4 targets and `[::]:0` for IPv6 targets.
pub(crate) fn bind_addr_for(target: &SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

/// Open a UDP socket on an ephemeral local port and connect it to `addr`.
///
/// Connecting makes the kernel drop datagrams from any other source.
pub fn connect_udp(addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = UdpSocket::bind(bind_addr_for(&addr))?;
    socket.connect(addr)?;
    debug!("connected {:?} -> {}", socket.local_addr(), addr);
    Ok(socket)
}
