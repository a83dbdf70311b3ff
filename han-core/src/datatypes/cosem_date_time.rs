//! COSEM date-time type as carried in meter notifications

use crate::error::{HanError, HanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Daylight-saving status carried in the date-time status byte
///
/// The high bit of the status byte means the status is unknown; a zero byte
/// means explicitly inactive; any other value means active. An unknown
/// status is treated as inactive for epoch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DstStatus {
    Active,
    Inactive,
    Unknown,
}

impl DstStatus {
    /// Parse the daylight-saving status from the raw status byte
    pub fn from_byte(byte: u8) -> Self {
        if byte & 0x80 != 0 {
            DstStatus::Unknown
        } else if byte == 0 {
            DstStatus::Inactive
        } else {
            DstStatus::Active
        }
    }
}

/// A COSEM date-time decoded from its 12-byte octet-string encoding
///
/// Wire layout: 2-byte big-endian year, month (1-based), day of month,
/// day of week (unused), hour, minute, second, then the daylight-saving
/// status byte. The remaining three bytes are not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosemDateTime {
    year: u16,
    month: u8,
    day_of_month: u8,
    hour: u8,
    minute: u8,
    second: u8,
    dst: DstStatus,
}

impl CosemDateTime {
    /// Encoded length of a COSEM date-time octet string
    pub const LENGTH: usize = 12;

    /// Decode a date-time from its 12-byte wire encoding
    pub fn decode(bytes: &[u8]) -> HanResult<Self> {
        if bytes.len() < Self::LENGTH {
            return Err(HanError::InvalidData(format!(
                "Date-time needs {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )));
        }

        let year = u16::from_be_bytes([bytes[0], bytes[1]]);
        let month = bytes[2];
        let day_of_month = bytes[3];
        // bytes[4] is the day of week, not needed for epoch conversion
        let hour = bytes[5];
        let minute = bytes[6];
        let second = bytes[7];
        let dst = DstStatus::from_byte(bytes[8]);

        if !(1..=12).contains(&month) || !(1..=31).contains(&day_of_month) {
            return Err(HanError::InvalidData(format!(
                "Invalid date: month {} day {}",
                month, day_of_month
            )));
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(HanError::InvalidData(format!(
                "Invalid time: {:02}:{:02}:{:02}",
                hour, minute, second
            )));
        }

        Ok(Self {
            year,
            month,
            day_of_month,
            hour,
            minute,
            second,
            dst,
        })
    }

    /// Whether daylight saving is active (unknown counts as inactive)
    pub fn dst_active(&self) -> bool {
        self.dst == DstStatus::Active
    }

    /// Get the daylight-saving status
    pub fn dst_status(&self) -> DstStatus {
        self.dst
    }

    /// Convert to unix seconds under the local standard-time convention
    ///
    /// The civil date is converted with a pure calendar computation, so the
    /// result does not depend on the host timezone database. When daylight
    /// saving is active the result is shifted backward by one hour.
    pub fn to_unix_time(&self) -> i64 {
        let days = days_from_civil(
            self.year as i64,
            self.month as i64,
            self.day_of_month as i64,
        );
        let mut seconds = days * 86_400
            + self.hour as i64 * 3_600
            + self.minute as i64 * 60
            + self.second as i64;
        if self.dst_active() {
            seconds -= 3_600;
        }
        seconds
    }
}

impl fmt::Display for CosemDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day_of_month, self.hour, self.minute, self.second
        )
    }
}

/// Days between 1970-01-01 and the given civil date (proleptic Gregorian)
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
