//! DLMS Data-Notification APDU header
//!
//! Wire layout of the frame payload:
//!
//! ```text
//! 0:    0f          APDU tag
//! 1-4:  40000000    long invoke id and priority (parsed, otherwise ignored)
//! 5:    00          extra header length e
//! 6+e:  011b        big-endian body length
//! 8+e:  ...         COSEM notification body
//! ```

use crate::error::{HanError, HanResult};

/// Data-Notification APDU tag
pub const APDU_TAG: u8 = 0x0F;

/// Minimum payload holding a complete header
const MIN_PAYLOAD_LEN: usize = 9;

/// Parsed Data-Notification header with a view into the COSEM body
///
/// Borrows the frame payload; valid only within the synchronous decode call
/// that produced the frame.
#[derive(Debug, PartialEq, Eq)]
pub struct DataNotification<'a> {
    /// Long invoke id and priority field
    pub invoke_id: u32,
    /// Body length the header declares
    pub declared_body_len: usize,
    /// The COSEM notification body
    pub body: &'a [u8],
}

impl<'a> DataNotification<'a> {
    /// Parse the APDU header at the start of a frame payload
    pub fn parse(payload: &'a [u8]) -> HanResult<Self> {
        if payload.len() < MIN_PAYLOAD_LEN {
            return Err(HanError::Protocol(format!(
                "APDU too small: {} bytes",
                payload.len()
            )));
        }
        if payload[0] != APDU_TAG {
            return Err(HanError::Protocol(format!(
                "APDU should start with tag 0x{:02X}, not 0x{:02X}",
                APDU_TAG, payload[0]
            )));
        }

        let invoke_id = u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]);
        let extra_header_len = payload[5] as usize;

        let pos = 6 + extra_header_len;
        if pos + 2 > payload.len() {
            return Err(HanError::Protocol(
                "APDU truncated inside the extra header".to_string(),
            ));
        }
        let declared_body_len = (payload[pos] as usize) << 8 | payload[pos + 1] as usize;

        Ok(Self {
            invoke_id,
            declared_body_len,
            body: &payload[pos + 2..],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documented_header() {
        let payload = [
            0x0F, 0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x1B, 0x02, 0x02, 0x09,
        ];
        let notification = DataNotification::parse(&payload).unwrap();
        assert_eq!(notification.invoke_id, 0x4000_0000);
        assert_eq!(notification.declared_body_len, 0x011B);
        assert_eq!(notification.body, &[0x02, 0x02, 0x09]);
    }

    #[test]
    fn test_parse_with_extra_header() {
        let payload = [
            0x0F, 0x00, 0x00, 0x00, 0x01, 0x02, 0xAA, 0xBB, 0x00, 0x04, 0x02, 0x02,
        ];
        let notification = DataNotification::parse(&payload).unwrap();
        assert_eq!(notification.invoke_id, 1);
        assert_eq!(notification.declared_body_len, 4);
        assert_eq!(notification.body, &[0x02, 0x02]);
    }

    #[test]
    fn test_parse_rejects_short_payload() {
        assert!(DataNotification::parse(&[0x0F, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_tag() {
        let payload = [0xC2, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(DataNotification::parse(&payload).is_err());
    }

    #[test]
    fn test_parse_rejects_oversize_extra_header() {
        let payload = [0x0F, 0, 0, 0, 0, 0xF0, 0, 0, 0, 0];
        assert!(DataNotification::parse(&payload).is_err());
    }
}
