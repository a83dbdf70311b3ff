//! COSEM record encoding: tags, layout offsets, and the recursive
//! self-describing length algorithm

use crate::error::{HanError, HanResult};

/// Structure tag: second byte is the nested element count
pub const TAG_STRUCT: u8 = 0x02;
/// Unsigned 32-bit integer, 4 payload bytes
pub const TAG_UNSIGNED32: u8 = 0x06;
/// Octet string: second byte is the payload length
pub const TAG_OCTET_STRING: u8 = 0x09;
/// Signed 8-bit integer, 1 payload byte
pub const TAG_INTEGER8: u8 = 0x0F;
/// Signed 16-bit integer, 2 payload bytes
pub const TAG_INTEGER16: u8 = 0x10;
/// Unsigned 16-bit integer, 2 payload bytes
pub const TAG_UNSIGNED16: u8 = 0x12;
/// Enumeration, 1 payload byte
pub const TAG_ENUM: u8 = 0x16;

/// Length of the OBIS identifier octet string inside a record
pub const OBIS_LENGTH: u8 = 6;

/// Offset of the 6-byte OBIS identifier within a record
/// (struct header + octet-string header)
pub const IDENTIFIER_OFFSET: usize = 4;

/// Offset of the value tag within a record
/// (struct header + complete 8-byte identifier element)
pub const VALUE_OFFSET: usize = 10;

/// Minimum plausible record: identifier element plus any value
pub const MIN_RECORD_LEN: usize = 11;

/// Recursion limit for nested structures; generous for a body that fits the
/// 2048-byte frame buffer, and keeps corrupt input from exhausting the stack
const MAX_DEPTH: usize = 16;

/// Compute how many bytes the encoded value at `buffer[0]` occupies
///
/// Composite (struct) values are summed recursively, visiting siblings left
/// to right. An unrecognized tag or insufficient bytes is an error the
/// caller must treat as unrecoverable for the current body.
pub fn record_length(buffer: &[u8]) -> HanResult<usize> {
    record_length_inner(buffer, 0)
}

fn record_length_inner(buffer: &[u8], depth: usize) -> HanResult<usize> {
    if depth >= MAX_DEPTH {
        return Err(HanError::InvalidData(
            "COSEM structure nested too deeply".to_string(),
        ));
    }
    if buffer.len() < 2 {
        return Err(HanError::InvalidData("Invalid COSEM coding".to_string()));
    }

    match buffer[0] {
        TAG_STRUCT => {
            let elements = buffer[1] as usize;
            let mut length = 2;
            for _ in 0..elements {
                let rest = buffer.get(length..).unwrap_or(&[]);
                length += record_length_inner(rest, depth + 1)?;
            }
            Ok(length)
        }
        TAG_OCTET_STRING => Ok(2 + buffer[1] as usize),
        TAG_UNSIGNED32 => Ok(5),
        TAG_INTEGER16 | TAG_UNSIGNED16 => Ok(3),
        TAG_INTEGER8 | TAG_ENUM => Ok(2),
        tag => Err(HanError::InvalidData(format!(
            "Unknown COSEM type 0x{:02X}",
            tag
        ))),
    }
}

/// The 6-byte OBIS identifier field of a record, if present
pub fn record_identifier(record: &[u8]) -> Option<&[u8]> {
    record.get(IDENTIFIER_OFFSET..IDENTIFIER_OFFSET + OBIS_LENGTH as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_lengths() {
        assert_eq!(record_length(&[TAG_UNSIGNED32, 0, 0, 0, 0]).unwrap(), 5);
        assert_eq!(record_length(&[TAG_INTEGER16, 0, 0]).unwrap(), 3);
        assert_eq!(record_length(&[TAG_UNSIGNED16, 0, 0]).unwrap(), 3);
        assert_eq!(record_length(&[TAG_INTEGER8, 0]).unwrap(), 2);
        assert_eq!(record_length(&[TAG_ENUM, 0]).unwrap(), 2);
    }

    #[test]
    fn test_octet_string_length() {
        assert_eq!(record_length(&[TAG_OCTET_STRING, 6, 1, 2, 3, 4, 5, 6]).unwrap(), 8);
        assert_eq!(record_length(&[TAG_OCTET_STRING, 0]).unwrap(), 2);
    }

    #[test]
    fn test_empty_struct() {
        assert_eq!(record_length(&[TAG_STRUCT, 0]).unwrap(), 2);
    }

    #[test]
    fn test_struct_sums_nested_lengths() {
        // struct { u32, i16, enum }
        let bytes = [
            TAG_STRUCT, 3, TAG_UNSIGNED32, 0, 0, 4, 0x62, TAG_INTEGER16, 0, 0, TAG_ENUM, 0x1B,
        ];
        assert_eq!(record_length(&bytes).unwrap(), 2 + 5 + 3 + 2);
    }

    #[test]
    fn test_nested_struct() {
        // struct { octet-string[6], u32, struct { i8, enum } }
        let bytes = [
            TAG_STRUCT, 3, TAG_OCTET_STRING, 6, 1, 0, 1, 7, 0, 255, TAG_UNSIGNED32, 0, 0, 4,
            0x62, TAG_STRUCT, 2, TAG_INTEGER8, 0, TAG_ENUM, 0x1B,
        ];
        assert_eq!(record_length(&bytes).unwrap(), 21);
    }

    #[test]
    fn test_unknown_tag_is_error() {
        assert!(record_length(&[0x55, 0]).is_err());
    }

    #[test]
    fn test_truncated_input_is_error() {
        assert!(record_length(&[TAG_STRUCT]).is_err());
        // struct declares an element the buffer does not contain
        assert!(record_length(&[TAG_STRUCT, 1]).is_err());
    }

    #[test]
    fn test_excessive_nesting_is_error() {
        // 17 levels of single-element structs around a leaf
        let mut bytes = Vec::new();
        for _ in 0..17 {
            bytes.extend_from_slice(&[TAG_STRUCT, 1]);
        }
        bytes.extend_from_slice(&[TAG_ENUM, 0]);
        assert!(record_length(&bytes).is_err());
    }

    #[test]
    fn test_record_identifier() {
        let record = [
            TAG_STRUCT, 2, TAG_OCTET_STRING, 6, 1, 0, 1, 7, 0, 255, TAG_ENUM, 0,
        ];
        assert_eq!(record_identifier(&record).unwrap(), &[1, 0, 1, 7, 0, 255]);
        assert!(record_identifier(&record[..8]).is_none());
    }
}
