//! Link layer for HAN meter telemetry
//!
//! This crate provides the HDLC framing used by the meter's push channel:
//! FCS (CRC-16/X.25) calculation, frame encoding for test-vector
//! construction, and the byte-at-a-time frame decoder.

pub mod error;
pub mod hdlc;

pub use error::{HanError, HanResult};
pub use hdlc::*;
