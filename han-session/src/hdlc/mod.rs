//! HDLC link layer module

pub mod decoder;
pub mod fcs;
pub mod frame;

pub use decoder::{HdlcFrameDecoder, HDLC_BUFFER_SIZE};
pub use fcs::FcsCalc;
pub use frame::{
    encode_frame, escape_into, ESCAPE, ESCAPE_MASK, FLAG, FRAME_FORMAT_TYPE, LLC_HEADER,
    LLC_HEADER_SIZE, MAC_FOOTER_SIZE,
};
