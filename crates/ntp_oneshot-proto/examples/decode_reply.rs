// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

// Offline NTP packet walkthrough
//
// Builds a client request, plays the server's part by hand, decodes the reply
// bytes and evaluates the exchange. No sockets are involved.
//
// Usage:
//   cargo run -p ntp_oneshot-proto --example decode_reply

use chrono::TimeDelta;
use ntp_proto::error::PacketError;
use ntp_proto::ntp_time;
use ntp_proto::protocol::{AssociationMode, ConstPackedSizeBytes, LeapIndicator, Packet};

fn main() -> Result<(), PacketError> {
    // ── 1. Client request ───────────────────────────────────────────────
    let request = Packet::new();
    println!("request ({} bytes): {request}", Packet::PACKED_SIZE_BYTES);

    // ── 2. Server reply, 250 ms ahead of us, 20 ms each way ─────────────
    let t1 = request.origin_timestamp().unwrap_or_else(ntp_time::now);
    let skew = TimeDelta::milliseconds(250);
    let one_way = TimeDelta::milliseconds(20);

    let mut server = Packet::from_bytes(request.as_bytes())?;
    server.set_leap_indicator(LeapIndicator::NoWarning);
    server.set_mode(AssociationMode::Server);
    server.set_stratum(1);
    server.set_reference_id(u32::from_be_bytes(*b"GPS\0"));
    server.set_receive_timestamp(Some(t1 + one_way + skew));
    server.set_transmit_timestamp(Some(t1 + one_way + skew + TimeDelta::milliseconds(1)));
    let wire = server.into_bytes();

    // ── 3. Client side: decode, complete the exchange, evaluate ─────────
    let mut reply = Packet::from_bytes(wire)?;
    reply.set_origin_timestamp(request.origin_timestamp());
    reply.set_destination_timestamp(Some(t1 + one_way * 2 + TimeDelta::milliseconds(1)));

    println!("reply: {reply}");
    println!("round trip: {}", reply.round_trip_time()?);
    println!("offset:     {}", reply.correction_offset()?);

    // ── 4. Short buffers are rejected ───────────────────────────────────
    match Packet::from_bytes(&reply.as_bytes()[..20]) {
        Ok(_) => println!("unexpected: 20 bytes decoded"),
        Err(e) => println!("20-byte buffer: {e}"),
    }
    Ok(())
}
