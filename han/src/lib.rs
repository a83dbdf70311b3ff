//! han_rs - decoder for HAN smart meter telemetry
//!
//! This library decodes the push channel of a DLMS/COSEM smart meter: HDLC
//! frames received over a serial line, carrying Data-Notification APDUs
//! whose COSEM body holds OBIS-identified registers.
//!
//! # Architecture
//!
//! The workspace is organized as one crate per protocol layer:
//!
//! - `han-core`: error type, OBIS codes, decoded value types
//! - `han-transport`: the byte source the decoder polls
//! - `han-session`: HDLC link layer (FCS, framing, the push decoder)
//! - `han-application`: DLMS/COSEM decoding, listeners, dispatch
//!
//! # Usage
//!
//! ```no_run
//! use han::{HanDecoder, MeterValue, ObisCode, ObisSensor};
//!
//! let mut decoder = HanDecoder::new();
//! decoder.register_listener(Box::new(ObisSensor::new(
//!     ObisCode::from_string("1-0:1.7.0").unwrap(),
//!     Box::new(|value: MeterValue| println!("active power: {}", value)),
//! )));
//! ```
//!
//! The host then calls `decoder.poll(&mut source)` from its read loop.

// Re-export core types
pub use han_core::datatypes::{CosemDateTime, DstStatus, MeterValue};
pub use han_core::{HanError, HanResult, ObisCode};

// Re-export the transport seam
pub use han_transport::{BufferedSource, ByteSource};

// Re-export the link layer
pub mod hdlc {
    pub use han_session::hdlc::*;
}
pub use han_session::hdlc::{FcsCalc, HdlcFrameDecoder};

// Re-export the application layer
pub use han_application::{
    DataNotification, HanDecoder, ListenerRegistry, ObisListener, ObisSensor, TimeSensor,
    ValueSink,
};
