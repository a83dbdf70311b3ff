//! HDLC frame constants and frame construction
//!
//! The decoder in this stack is receive-only; the encoder here is the
//! bit-exact inverse of it, used to build frames for loopback testing and
//! to document the wire format in code.

use crate::hdlc::fcs::FcsCalc;

/// HDLC frame delimiter flag
pub const FLAG: u8 = 0x7E;

/// Control-escape octet used for byte stuffing
pub const ESCAPE: u8 = 0x7D;

/// Mask XORed with an escaped byte
pub const ESCAPE_MASK: u8 = 0x20;

/// Expected frame format type in the upper nibble of the format field
pub const FRAME_FORMAT_TYPE: u8 = 0xA0;

/// LLC header carried in front of the DLMS payload: dest LSAP, src LSAP, quality
pub const LLC_HEADER: [u8; 3] = [0xE6, 0xE7, 0x00];

/// Size of the LLC header in bytes
pub const LLC_HEADER_SIZE: usize = 3;

/// Size of the MAC footer (the FCS field only)
pub const MAC_FOOTER_SIZE: usize = 2;

/// Append `bytes` to `dst`, byte-stuffing any flag or escape octet
///
/// Reserved control values are replaced by the escape octet followed by the
/// byte XORed with the escape mask, so neither 0x7E nor 0x7D ever appears
/// between the frame delimiters.
pub fn escape_into(dst: &mut Vec<u8>, bytes: &[u8]) {
    for &byte in bytes {
        if byte == FLAG || byte == ESCAPE {
            dst.push(ESCAPE);
            dst.push(byte ^ ESCAPE_MASK);
        } else {
            dst.push(byte);
        }
    }
}

/// Encode a complete HDLC frame around `information`
///
/// `dest` and `src` are the address fields exactly as transmitted; the last
/// byte of each must have its least-significant bit set to terminate the
/// field. The information field normally starts with [`LLC_HEADER`].
/// Returns the frame including both delimiter flags, with the header check
/// sequence, frame check sequence, and byte stuffing applied.
pub fn encode_frame(dest: &[u8], src: &[u8], control: u8, information: &[u8]) -> Vec<u8> {
    debug_assert!(!dest.is_empty() && dest[dest.len() - 1] & 0x01 == 0x01);
    debug_assert!(!src.is_empty() && src[src.len() - 1] & 0x01 == 0x01);

    // Frame length excludes the two delimiter flags
    let frame_length = 2 + dest.len() + src.len() + 1 + 2 + information.len() + 2;
    let mut body = Vec::with_capacity(frame_length);

    body.push(FRAME_FORMAT_TYPE | ((frame_length >> 8) & 0x07) as u8);
    body.push((frame_length & 0xFF) as u8);
    body.extend_from_slice(dest);
    body.extend_from_slice(src);
    body.push(control);

    let hcs = FcsCalc::checksum(&body);
    body.push((hcs & 0xFF) as u8);
    body.push((hcs >> 8) as u8);

    body.extend_from_slice(information);

    let fcs = FcsCalc::checksum(&body);
    body.push((fcs & 0xFF) as u8);
    body.push((fcs >> 8) as u8);

    let mut frame = Vec::with_capacity(body.len() + 2);
    frame.push(FLAG);
    escape_into(&mut frame, &body);
    frame.push(FLAG);
    frame
}
