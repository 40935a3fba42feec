use byteorder::{BE, ByteOrder};

use super::{ConstPackedSizeBytes, FromBytes, Packet, TimestampFormat, ToBytes};
use crate::error::PacketError;

fn ensure_len(buf: &[u8], needed: usize) -> Result<(), PacketError> {
    if buf.len() < needed {
        return Err(PacketError::BufferTooShort {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

impl FromBytes for TimestampFormat {
    fn from_bytes(buf: &[u8]) -> Result<(Self, usize), PacketError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        let seconds = BE::read_u32(&buf[0..4]);
        let fraction = BE::read_u32(&buf[4..8]);
        Ok((
            TimestampFormat { seconds, fraction },
            Self::PACKED_SIZE_BYTES,
        ))
    }
}

impl ToBytes for TimestampFormat {
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, PacketError> {
        ensure_len(buf, Self::PACKED_SIZE_BYTES)?;
        BE::write_u32(&mut buf[0..4], self.seconds);
        BE::write_u32(&mut buf[4..8], self.fraction);
        Ok(Self::PACKED_SIZE_BYTES)
    }
}

impl ToBytes for Packet {
    /// Writes the full datagram (header and extension bytes). The destination
    /// timestamp has no wire form and is not written.
    fn to_bytes(&self, buf: &mut [u8]) -> Result<usize, PacketError> {
        let bytes = self.as_bytes();
        ensure_len(buf, bytes.len())?;
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(bytes.len())
    }
}
