use core::fmt;

use byteorder::{BE, ByteOrder};
use chrono::{DateTime, TimeDelta, Utc};

use super::{AssociationMode, ConstPackedSizeBytes, LeapIndicator, TimestampFormat, VERSION};
use crate::error::{PacketError, TimestampField};
use crate::ntp_time;

// Byte offsets of the header fields.
const LI_VN_MODE: usize = 0;
const STRATUM: usize = 1;
const POLL: usize = 2;
const PRECISION: usize = 3;
const ROOT_DELAY: usize = 4;
const ROOT_DISPERSION: usize = 8;
const REFERENCE_ID: usize = 12;
const REFERENCE_TIMESTAMP: usize = 16;
const ORIGIN_TIMESTAMP: usize = 24;
const RECEIVE_TIMESTAMP: usize = 32;
const TRANSMIT_TIMESTAMP: usize = 40;

// Sub-fields of byte 0: LI (bits 6-7), VN (bits 3-5), Mode (bits 0-2).
const LI_MASK: u8 = 0b1100_0000;
const LI_SHIFT: u32 = 6;
const VN_MASK: u8 = 0b0011_1000;
const VN_SHIFT: u32 = 3;
const MODE_MASK: u8 = 0b0000_0111;
const MODE_SHIFT: u32 = 0;

/// **Packet Header** - an NTPv4 packet held as its wire bytes.
///
/// The buffer is the single source of truth: accessors decode fields from it on every call and
/// setters write straight into it, so [`as_bytes`](Packet::as_bytes) is always ready to send.
/// Bytes past the 48-byte header (extension fields, MAC) are kept verbatim and never interpreted.
///
/// The destination timestamp (T4) is the one exception: it has no wire representation and lives
/// beside the buffer, set by the client when a reply arrives.
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |    Stratum     |     Poll      |  Precision   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Delay                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         Root Dispersion                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Reference ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                     Reference Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Origin Timestamp (64)                    +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Receive Timestamp (64)                   +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                      Transmit Timestamp (64)                  +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Packet {
    buf: Vec<u8>,
    destination_timestamp: Option<DateTime<Utc>>,
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = 48;
}

impl Packet {
    /// A client request stamped with the current time as its origin timestamp.
    ///
    /// Mode is client, version is 4 and every other header field is zero.
    pub fn new() -> Self {
        let mut packet = Packet::empty();
        packet.set_origin_timestamp(Some(ntp_time::now()));
        packet
    }

    /// A client request template with no timestamps set.
    pub fn empty() -> Self {
        let mut buf = vec![0u8; Self::PACKED_SIZE_BYTES];
        buf[LI_VN_MODE] = (VERSION << VN_SHIFT) | AssociationMode::Client as u8;
        Packet {
            buf,
            destination_timestamp: None,
        }
    }

    /// Wrap a received datagram.
    ///
    /// Fails with [`PacketError::BufferTooShort`] when fewer than 48 bytes are supplied. Longer
    /// buffers are accepted and the trailing bytes kept as-is.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, PacketError> {
        let buf = bytes.into();
        if buf.len() < Self::PACKED_SIZE_BYTES {
            return Err(PacketError::BufferTooShort {
                needed: Self::PACKED_SIZE_BYTES,
                available: buf.len(),
            });
        }
        Ok(Packet {
            buf,
            destination_timestamp: None,
        })
    }

    /// The wire bytes, header first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the packet, returning its wire bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Length of the datagram in bytes, never less than 48.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Always `false`; present for symmetry with [`len`](Packet::len).
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Opaque bytes following the 48-byte header (extension fields, MAC).
    pub fn extension_bytes(&self) -> &[u8] {
        &self.buf[Self::PACKED_SIZE_BYTES..]
    }

    fn bits(&self, mask: u8, shift: u32) -> u8 {
        (self.buf[LI_VN_MODE] & mask) >> shift
    }

    fn set_bits(&mut self, mask: u8, shift: u32, value: u8) {
        let byte = &mut self.buf[LI_VN_MODE];
        *byte = (*byte & !mask) | ((value << shift) & mask);
    }

    /// Leap indicator, bits 6-7 of byte 0.
    pub fn leap_indicator(&self) -> LeapIndicator {
        LeapIndicator::from_bits(self.bits(LI_MASK, LI_SHIFT))
    }

    /// Set the leap indicator without touching version or mode.
    pub fn set_leap_indicator(&mut self, leap: LeapIndicator) {
        self.set_bits(LI_MASK, LI_SHIFT, leap as u8);
    }

    /// Version number, bits 3-5 of byte 0.
    pub fn version_number(&self) -> u8 {
        self.bits(VN_MASK, VN_SHIFT)
    }

    /// Set the version number without touching leap indicator or mode.
    ///
    /// The field is 3 bits wide; values above 7 are rejected.
    pub fn set_version_number(&mut self, version: u8) -> Result<(), PacketError> {
        if version > VN_MASK >> VN_SHIFT {
            return Err(PacketError::InvalidField {
                field: "version number",
                value: version as u32,
            });
        }
        self.set_bits(VN_MASK, VN_SHIFT, version);
        Ok(())
    }

    /// Raw association mode, bits 0-2 of byte 0.
    ///
    /// Returned unvalidated so packets from peers in other modes still decode.
    pub fn mode(&self) -> u8 {
        self.bits(MODE_MASK, MODE_SHIFT)
    }

    /// The mode as an [`AssociationMode`], or `None` for any mode other than client or server.
    pub fn association_mode(&self) -> Option<AssociationMode> {
        AssociationMode::try_from(self.mode()).ok()
    }

    /// Set the association mode without touching leap indicator or version.
    pub fn set_mode(&mut self, mode: AssociationMode) {
        self.set_bits(MODE_MASK, MODE_SHIFT, mode as u8);
    }

    /// Stratum: 0 unspecified, 1 primary, 2-15 secondary, 16 unsynchronized.
    pub fn stratum(&self) -> u8 {
        self.buf[STRATUM]
    }

    /// Set the stratum byte.
    pub fn set_stratum(&mut self, stratum: u8) {
        self.buf[STRATUM] = stratum;
    }

    /// Maximum interval between successive messages, in log2 seconds.
    pub fn poll(&self) -> i8 {
        self.buf[POLL] as i8
    }

    /// Set the poll exponent.
    pub fn set_poll(&mut self, poll: i8) {
        self.buf[POLL] = poll as u8;
    }

    /// Precision of the sender's clock, in log2 seconds (e.g. -20 is about a microsecond).
    pub fn precision(&self) -> i8 {
        self.buf[PRECISION] as i8
    }

    /// Set the precision exponent.
    pub fn set_precision(&mut self, precision: i8) {
        self.buf[PRECISION] = precision as u8;
    }

    /// Root delay as the raw 32-bit word at offset 4.
    ///
    /// RFC 5905 defines this as 16.16 fixed-point seconds; no unit conversion is applied.
    pub fn root_delay(&self) -> u32 {
        BE::read_u32(&self.buf[ROOT_DELAY..ROOT_DELAY + 4])
    }

    /// Set the raw root delay word.
    pub fn set_root_delay(&mut self, value: u32) {
        BE::write_u32(&mut self.buf[ROOT_DELAY..ROOT_DELAY + 4], value);
    }

    /// Root dispersion as the raw 32-bit word at offset 8, not unit-converted.
    pub fn root_dispersion(&self) -> u32 {
        BE::read_u32(&self.buf[ROOT_DISPERSION..ROOT_DISPERSION + 4])
    }

    /// Set the raw root dispersion word.
    pub fn set_root_dispersion(&mut self, value: u32) {
        BE::write_u32(&mut self.buf[ROOT_DISPERSION..ROOT_DISPERSION + 4], value);
    }

    /// Reference identifier at offset 12.
    ///
    /// Opaque: an ASCII code for stratum 0/1, an address-derived value otherwise.
    pub fn reference_id(&self) -> u32 {
        BE::read_u32(&self.buf[REFERENCE_ID..REFERENCE_ID + 4])
    }

    /// Set the reference identifier.
    pub fn set_reference_id(&mut self, value: u32) {
        BE::write_u32(&mut self.buf[REFERENCE_ID..REFERENCE_ID + 4], value);
    }

    fn wire_offset(field: TimestampField) -> Option<usize> {
        match field {
            TimestampField::Reference => Some(REFERENCE_TIMESTAMP),
            TimestampField::Origin => Some(ORIGIN_TIMESTAMP),
            TimestampField::Receive => Some(RECEIVE_TIMESTAMP),
            TimestampField::Transmit => Some(TRANSMIT_TIMESTAMP),
            TimestampField::Destination => None,
        }
    }

    /// The undecoded 32.32 value of a wire timestamp; `None` for the destination timestamp,
    /// which is not on the wire.
    pub fn raw_timestamp(&self, field: TimestampField) -> Option<TimestampFormat> {
        let offset = Self::wire_offset(field)?;
        Some(TimestampFormat::from_bits(BE::read_u64(
            &self.buf[offset..offset + TimestampFormat::PACKED_SIZE_BYTES],
        )))
    }

    /// Decode any of the five timestamps. An all-zero wire value reads as `None`.
    pub fn timestamp(&self, field: TimestampField) -> Option<DateTime<Utc>> {
        match self.raw_timestamp(field) {
            Some(raw) => ntp_time::timestamp_to_datetime(raw),
            None => self.destination_timestamp,
        }
    }

    /// Encode any of the five timestamps. `None` writes eight zero bytes.
    pub fn set_timestamp(&mut self, field: TimestampField, value: Option<DateTime<Utc>>) {
        match Self::wire_offset(field) {
            Some(offset) => {
                let raw = value
                    .map(ntp_time::datetime_to_timestamp)
                    .unwrap_or_default();
                BE::write_u64(
                    &mut self.buf[offset..offset + TimestampFormat::PACKED_SIZE_BYTES],
                    raw.to_bits(),
                );
            }
            None => self.destination_timestamp = value,
        }
    }

    /// Time the server clock was last set or corrected.
    pub fn reference_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp(TimestampField::Reference)
    }

    /// Set the reference timestamp.
    pub fn set_reference_timestamp(&mut self, value: Option<DateTime<Utc>>) {
        self.set_timestamp(TimestampField::Reference, value);
    }

    /// T1: time at the client when the request departed.
    pub fn origin_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp(TimestampField::Origin)
    }

    /// Set the origin timestamp.
    pub fn set_origin_timestamp(&mut self, value: Option<DateTime<Utc>>) {
        self.set_timestamp(TimestampField::Origin, value);
    }

    /// T2: time at the server when the request arrived.
    pub fn receive_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp(TimestampField::Receive)
    }

    /// Set the receive timestamp.
    pub fn set_receive_timestamp(&mut self, value: Option<DateTime<Utc>>) {
        self.set_timestamp(TimestampField::Receive, value);
    }

    /// T3: time at the server when the reply departed.
    pub fn transmit_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp(TimestampField::Transmit)
    }

    /// Set the transmit timestamp.
    pub fn set_transmit_timestamp(&mut self, value: Option<DateTime<Utc>>) {
        self.set_timestamp(TimestampField::Transmit, value);
    }

    /// T4: time at the client when the reply arrived. Held in memory only.
    pub fn destination_timestamp(&self) -> Option<DateTime<Utc>> {
        self.destination_timestamp
    }

    /// Set the destination timestamp. The wire buffer is not touched.
    pub fn set_destination_timestamp(&mut self, value: Option<DateTime<Utc>>) {
        self.destination_timestamp = value;
    }

    /// The four exchange timestamps T1..T4, or the first one that is missing.
    fn exchange(
        &self,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>, DateTime<Utc>, DateTime<Utc>), PacketError> {
        let require = |field| {
            self.timestamp(field)
                .ok_or(PacketError::MissingTimestamp(field))
        };
        Ok((
            require(TimestampField::Origin)?,
            require(TimestampField::Receive)?,
            require(TimestampField::Transmit)?,
            require(TimestampField::Destination)?,
        ))
    }

    /// Round-trip delay: `(T2 - T1) + (T4 - T3)`.
    ///
    /// Fails with [`PacketError::MissingTimestamp`] if origin, receive, transmit or destination
    /// is unset.
    pub fn round_trip_time(&self) -> Result<TimeDelta, PacketError> {
        let (t1, t2, t3, t4) = self.exchange()?;
        Ok((t2 - t1) + (t4 - t3))
    }

    /// Clock correction offset: `((T2 - T1) - (T4 - T3)) / 2`.
    ///
    /// Positive means the local clock is behind the server and should be advanced by this
    /// amount. Same preconditions as [`round_trip_time`](Packet::round_trip_time).
    pub fn correction_offset(&self) -> Result<TimeDelta, PacketError> {
        let (t1, t2, t3, t4) = self.exchange()?;
        Ok(((t2 - t1) - (t4 - t3)) / 2)
    }
}

impl Default for Packet {
    /// Same as [`Packet::new`]: a client request stamped with the current time.
    fn default() -> Self {
        Packet::new()
    }
}

impl TryFrom<&[u8]> for Packet {
    type Error = PacketError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Packet::from_bytes(bytes)
    }
}

impl TryFrom<Vec<u8>> for Packet {
    type Error = PacketError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Packet::from_bytes(bytes)
    }
}

struct OptionalTime(Option<DateTime<Utc>>);

impl fmt::Display for OptionalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "{}", t.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)),
            None => f.write_str("unset"),
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "li={} vn={} mode={} stratum={} poll={} precision={} refid={:#010x} \
             org={} rec={} xmt={}",
            self.leap_indicator() as u8,
            self.version_number(),
            self.mode(),
            self.stratum(),
            self.poll(),
            self.precision(),
            self.reference_id(),
            OptionalTime(self.origin_timestamp()),
            OptionalTime(self.receive_timestamp()),
            OptionalTime(self.transmit_timestamp()),
        )
    }
}
