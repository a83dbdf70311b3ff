//! Application layer for HAN meter telemetry
//!
//! This crate decodes the DLMS Data-Notification APDU carried in HDLC frame
//! payloads: header parsing, the self-describing COSEM record walk, typed
//! value decoding, and dispatch of each record to the listener registered
//! for its OBIS identifier.

pub mod cosem;
pub mod decoder;
pub mod error;
pub mod listener;
pub mod notification;
pub mod registry;
pub mod value;

pub use decoder::HanDecoder;
pub use error::{HanError, HanResult};
pub use listener::{ObisListener, ObisSensor, TimeSensor, ValueSink};
pub use notification::{DataNotification, APDU_TAG};
pub use registry::ListenerRegistry;
pub use value::decode_value;
