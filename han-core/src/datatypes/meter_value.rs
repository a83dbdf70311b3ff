//! Decoded meter value type

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single decoded meter reading
///
/// The set of shapes is closed and fixed by the COSEM tag table used by the
/// meter: big-endian integers of the declared widths, the 8-bit enumeration
/// type, and the 12-byte date-time decoded to a unix timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeterValue {
    /// Unsigned 32-bit integer (tag 0x06)
    Unsigned32(u32),
    /// Signed 16-bit integer (tag 0x10)
    Integer16(i16),
    /// Unsigned 16-bit integer (tag 0x12)
    Unsigned16(u16),
    /// Signed 8-bit integer (tag 0x0F)
    Integer8(i8),
    /// Enumeration, 8-bit unsigned (tag 0x16)
    Enumerate(u8),
    /// Date-time decoded to unix seconds (tag 0x09, 12-byte octet string)
    Timestamp(i64),
}

impl MeterValue {
    /// Get the value as a float, the form most sinks publish
    pub fn as_f64(&self) -> f64 {
        match self {
            MeterValue::Unsigned32(v) => *v as f64,
            MeterValue::Integer16(v) => *v as f64,
            MeterValue::Unsigned16(v) => *v as f64,
            MeterValue::Integer8(v) => *v as f64,
            MeterValue::Enumerate(v) => *v as f64,
            MeterValue::Timestamp(v) => *v as f64,
        }
    }

    /// Check if this value is a timestamp
    pub fn is_timestamp(&self) -> bool {
        matches!(self, MeterValue::Timestamp(_))
    }
}

impl fmt::Display for MeterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterValue::Unsigned32(v) => write!(f, "{}", v),
            MeterValue::Integer16(v) => write!(f, "{}", v),
            MeterValue::Unsigned16(v) => write!(f, "{}", v),
            MeterValue::Integer8(v) => write!(f, "{}", v),
            MeterValue::Enumerate(v) => write!(f, "{}", v),
            MeterValue::Timestamp(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_f64() {
        assert_eq!(MeterValue::Unsigned32(1122).as_f64(), 1122.0);
        assert_eq!(MeterValue::Integer16(-40).as_f64(), -40.0);
        assert_eq!(MeterValue::Integer8(-1).as_f64(), -1.0);
    }

    #[test]
    fn test_is_timestamp() {
        assert!(MeterValue::Timestamp(0).is_timestamp());
        assert!(!MeterValue::Unsigned16(1).is_timestamp());
    }
}
