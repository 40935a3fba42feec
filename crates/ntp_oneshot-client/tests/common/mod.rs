// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but clippy flags them as unreachable outside the crate.
#![allow(unreachable_pub, dead_code)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Returns `true` if the I/O error indicates a network-level failure that
/// should cause the test to be **skipped** (not panicked).
///
/// CI runners occasionally lack outbound UDP/123 access, causing errors such
/// as `ENETUNREACH` (101) or `EHOSTUNREACH` (113) in addition to the usual
/// `TimedOut` / `WouldBlock`.
pub fn is_network_skip_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::TimedOut
            | std::io::ErrorKind::WouldBlock
            | std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::AddrNotAvailable
            | std::io::ErrorKind::NotFound
    ) || e.raw_os_error() == Some(101) // ENETUNREACH  (Network is unreachable)
      || e.raw_os_error() == Some(113) // EHOSTUNREACH (No route to host)
      || e.to_string().contains("Network is unreachable")
      || e.to_string().contains("No route to host")
      || e.to_string().contains("failed to lookup address")
}

/// A one-datagram NTP server on the loopback interface.
///
/// Receives a single request, answers it with whatever `respond` returns (nothing if
/// `None`), and yields the request bytes through the join handle.
pub fn spawn_server<F>(respond: F) -> (SocketAddr, JoinHandle<Vec<u8>>)
where
    F: FnOnce(&[u8]) -> Option<Vec<u8>> + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind loopback server");
    socket
        .set_read_timeout(Some(Duration::from_secs(10)))
        .expect("server read timeout");
    let addr = socket.local_addr().expect("server address");

    let handle = thread::spawn(move || {
        let mut buf = [0u8; 1024];
        let (len, from) = socket.recv_from(&mut buf).expect("server recv");
        let request = buf[..len].to_vec();
        if let Some(reply) = respond(&request) {
            socket.send_to(&reply, from).expect("server send");
        }
        request
    });
    (addr, handle)
}
