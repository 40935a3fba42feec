// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Query one NTP server and print the reply, the offset and the delay.
//!
//! Usage: `cargo run -p ntp_oneshot-client --example query [server]`

use chrono::Local;
use std::error::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    let server = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "time.nist.gov".to_string());

    let mut client = ntp_client::NtpClient::builder()
        .server(server.as_str())
        .timeout(Duration::from_secs(5))
        .build()?;
    let reply = client.query()?;
    client.close();

    println!("{server} ({:?})", client.peer_addr());
    println!("  {reply}");
    if let Some(t3) = reply.transmit_timestamp() {
        println!("  server time: {}", t3.with_timezone(&Local));
    }
    println!("  offset: {}", reply.correction_offset()?);
    println!("  delay:  {}", reply.round_trip_time()?);
    Ok(())
}
