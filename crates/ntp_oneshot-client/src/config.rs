// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Client defaults and the [`NtpClientBuilder`].

use log::trace;

use crate::client::NtpClient;
use crate::error::{ConfigError, NtpError};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Receive timeout applied to every new client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Smallest receive timeout a client accepts.
pub const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Port used when a server is given without one.
pub const DEFAULT_PORT: u16 = ntp_proto::protocol::PORT;

/// Reject timeouts below [`MIN_TIMEOUT`].
pub(crate) fn validate_timeout(timeout: Duration) -> Result<Duration, ConfigError> {
    if timeout < MIN_TIMEOUT {
        return Err(ConfigError::TimeoutTooShort { requested: timeout });
    }
    Ok(timeout)
}

/// Append [`DEFAULT_PORT`] to a server string that does not name a port.
///
/// Accepts `host`, `host:port`, `ip`, `ip:port`, `[v6]` and `[v6]:port`.
pub(crate) fn with_default_port(server: &str) -> String {
    if server.parse::<SocketAddr>().is_ok() {
        return server.to_owned();
    }
    let bare = server.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_PORT).to_string();
    }
    match server.rsplit_once(':') {
        Some((_, port)) if port.parse::<u16>().is_ok() => server.to_owned(),
        _ => format!("{server}:{DEFAULT_PORT}"),
    }
}

/// Builder for configuring and creating an [`NtpClient`].
///
/// ```no_run
/// use std::time::Duration;
///
/// let mut client = ntp_client::NtpClient::builder()
///     .server("time.nist.gov")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// let offset = client.correction_offset()?;
/// println!("local clock is off by {offset}");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct NtpClientBuilder {
    server: Option<String>,
    timeout: Duration,
}

impl NtpClientBuilder {
    pub(crate) fn new() -> Self {
        NtpClientBuilder {
            server: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the NTP server (hostname or IP, with or without `:port`).
    pub fn server(mut self, addr: impl Into<String>) -> Self {
        self.server = Some(addr.into());
        self
    }

    /// Set the receive timeout (default: 15s, minimum: 1ms).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve the server, open the socket and apply the timeout.
    ///
    /// Fails with [`ConfigError::NoServer`] if no server was set, or
    /// [`ConfigError::TimeoutTooShort`] before any socket is opened.
    pub fn build(self) -> io::Result<NtpClient> {
        let server = self.server.ok_or(NtpError::Config(ConfigError::NoServer))?;
        let timeout = validate_timeout(self.timeout).map_err(NtpError::from)?;
        let target = with_default_port(&server);
        trace!("building client for {target} with timeout {timeout:?}");

        let mut client = NtpClient::connect(target.as_str())?;
        client.set_timeout(timeout)?;
        Ok(client)
    }
}
