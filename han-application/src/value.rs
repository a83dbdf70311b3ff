//! Typed value decoding for a single COSEM record

use crate::cosem::{
    TAG_ENUM, TAG_INTEGER16, TAG_INTEGER8, TAG_OCTET_STRING, TAG_UNSIGNED16, TAG_UNSIGNED32,
    VALUE_OFFSET,
};
use crate::error::{HanError, HanResult};
use han_core::datatypes::{CosemDateTime, MeterValue};

/// Decode the value element of a record into a typed meter value
///
/// The record starts at its struct header; the value tag sits at a fixed
/// offset behind the identifier element. Integers are big-endian of the
/// width the tag declares. An octet string of exactly 12 bytes is the
/// date-time encoding and decodes to a unix timestamp with the
/// daylight-saving shift applied.
pub fn decode_value(record: &[u8]) -> HanResult<MeterValue> {
    let value = record.get(VALUE_OFFSET..).unwrap_or(&[]);
    if value.len() < 2 {
        return Err(HanError::InvalidData(
            "Record too short to hold a value".to_string(),
        ));
    }

    match value[0] {
        TAG_UNSIGNED32 => {
            let bytes = take::<4>(&value[1..])?;
            Ok(MeterValue::Unsigned32(u32::from_be_bytes(bytes)))
        }
        TAG_INTEGER16 => {
            let bytes = take::<2>(&value[1..])?;
            Ok(MeterValue::Integer16(i16::from_be_bytes(bytes)))
        }
        TAG_UNSIGNED16 => {
            let bytes = take::<2>(&value[1..])?;
            Ok(MeterValue::Unsigned16(u16::from_be_bytes(bytes)))
        }
        TAG_INTEGER8 => Ok(MeterValue::Integer8(value[1] as i8)),
        TAG_ENUM => Ok(MeterValue::Enumerate(value[1])),
        TAG_OCTET_STRING if value[1] as usize == CosemDateTime::LENGTH => {
            let date_time = CosemDateTime::decode(&value[2..])?;
            Ok(MeterValue::Timestamp(date_time.to_unix_time()))
        }
        tag => Err(HanError::InvalidData(format!(
            "Unknown DLMS value type 0x{:02X}",
            tag
        ))),
    }
}

fn take<const N: usize>(bytes: &[u8]) -> HanResult<[u8; N]> {
    let slice = bytes
        .get(..N)
        .ok_or_else(|| HanError::InvalidData("Truncated value field".to_string()))?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}
