use core::fmt;

use super::ConstPackedSizeBytes;
use crate::error::PacketError;

/// **NTP Timestamp Format** - Used in packet headers and other places with limited word size. It
/// includes a 32-bit unsigned seconds field spanning 136 years and a 32-bit fraction field
/// resolving 232 picoseconds.
///
/// The prime epoch is 0 h 1 January 1900 UTC, when all bits are zero. An all-zero value on the
/// wire means the timestamp is not set.
///
/// ### Layout
///
/// ```ignore
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Seconds                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            Fraction                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimestampFormat {
    /// Seconds since 1900-01-01 00:00:00 UTC (32-bit unsigned).
    pub seconds: u32,
    /// Fractional seconds (32-bit unsigned, resolution of ~232 picoseconds).
    pub fraction: u32,
}

impl TimestampFormat {
    /// Split a 64-bit fixed-point value into its seconds (upper 32 bits) and fraction (lower 32
    /// bits).
    pub const fn from_bits(bits: u64) -> Self {
        TimestampFormat {
            seconds: (bits >> 32) as u32,
            fraction: bits as u32,
        }
    }

    /// The 64-bit fixed-point value, seconds in the upper half.
    pub const fn to_bits(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Whether this is the "not set" sentinel (all bits zero).
    pub const fn is_unset(self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }
}

/// A 2-bit integer warning of an impending leap second to be inserted or deleted in the last
/// minute of the current month.
///
/// Note that this field is packed in the actual header.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No leap required.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    LastMinute61 = 1,
    /// Last minute of the day has 59 seconds.
    LastMinute59 = 2,
    /// Alarm condition: clock unsynchronized.
    Alarm = 3,
}

impl LeapIndicator {
    /// Interpret the low two bits of `bits`. Every 2-bit pattern is a valid indicator.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::LastMinute61,
            2 => LeapIndicator::LastMinute59,
            _ => LeapIndicator::Alarm,
        }
    }
}

impl TryFrom<u8> for LeapIndicator {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b11 {
            return Err(PacketError::InvalidField {
                field: "leap indicator",
                value: value as u32,
            });
        }
        Ok(LeapIndicator::from_bits(value))
    }
}

/// The association modes a client produces or expects to receive.
///
/// Note that while this enum is 8-bits, this field is packed to 3 in the actual header. Other
/// mode values found in received packets are reported raw by [`Packet::mode`](super::Packet::mode).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum AssociationMode {
    /// Client mode (value 3).
    #[default]
    Client = 3,
    /// Server mode (value 4).
    Server = 4,
}

impl TryFrom<u8> for AssociationMode {
    type Error = PacketError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(AssociationMode::Client),
            4 => Ok(AssociationMode::Server),
            _ => Err(PacketError::InvalidField {
                field: "association mode",
                value: value as u32,
            }),
        }
    }
}

impl fmt::Display for LeapIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LeapIndicator::NoWarning => "no warning",
            LeapIndicator::LastMinute61 => "last minute has 61 seconds",
            LeapIndicator::LastMinute59 => "last minute has 59 seconds",
            LeapIndicator::Alarm => "alarm (unsynchronized)",
        };
        f.write_str(text)
    }
}

// Size implementations.

impl ConstPackedSizeBytes for TimestampFormat {
    const PACKED_SIZE_BYTES: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_bits_split() {
        let ts = TimestampFormat::from_bits(0xE93C_7680_8000_0000);
        assert_eq!(ts.seconds, 0xE93C_7680);
        assert_eq!(ts.fraction, 0x8000_0000);
        assert_eq!(ts.to_bits(), 0xE93C_7680_8000_0000);
        assert!(!ts.is_unset());
        assert!(TimestampFormat::default().is_unset());
    }

    #[test]
    fn leap_indicator_try_from() {
        assert_eq!(LeapIndicator::try_from(0).unwrap(), LeapIndicator::NoWarning);
        assert_eq!(LeapIndicator::try_from(3).unwrap(), LeapIndicator::Alarm);
        assert!(LeapIndicator::try_from(4).is_err());
    }

    #[test]
    fn association_mode_try_from() {
        assert_eq!(AssociationMode::try_from(3).unwrap(), AssociationMode::Client);
        assert_eq!(AssociationMode::try_from(4).unwrap(), AssociationMode::Server);
        assert_eq!(
            AssociationMode::try_from(5),
            Err(PacketError::InvalidField {
                field: "association mode",
                value: 5,
            })
        );
    }
}
