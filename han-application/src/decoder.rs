//! Top-level decoder: drains a byte source through the HDLC layer and hands
//! validated payloads to the listener registry

use crate::listener::ObisListener;
use crate::registry::ListenerRegistry;
use han_session::hdlc::HdlcFrameDecoder;
use han_transport::ByteSource;

/// Smallest payload worth parsing: a full APDU header plus a record start
const MIN_PAYLOAD_LEN: usize = 11;

/// HAN telemetry decoder
///
/// Owns the link-layer frame decoder and the listener registry. The host
/// calls [`poll`] whenever bytes may be available; everything runs to
/// completion synchronously, and payload views never outlive the call.
///
/// [`poll`]: HanDecoder::poll
#[derive(Default)]
pub struct HanDecoder {
    hdlc: HdlcFrameDecoder,
    registry: ListenerRegistry,
}

impl HanDecoder {
    /// Create a decoder with no listeners registered
    pub fn new() -> Self {
        Self {
            hdlc: HdlcFrameDecoder::new(),
            registry: ListenerRegistry::new(),
        }
    }

    /// Register a listener for one OBIS identifier
    pub fn register_listener(&mut self, listener: Box<dyn ObisListener>) {
        self.registry.register(listener);
    }

    /// Drain all currently available bytes from the source
    ///
    /// Each byte is fed to the frame decoder; every completed frame is
    /// decoded and its records dispatched before the next byte is read.
    pub fn poll(&mut self, source: &mut dyn ByteSource) {
        while source.available() > 0 {
            let Some(input) = source.read_byte() else {
                break;
            };
            if self.hdlc.push(input) {
                log::info!("HDLC frame received");
                match self.hdlc.data() {
                    Some(data) if data.len() >= MIN_PAYLOAD_LEN => {
                        self.registry.decode_notification(data);
                    }
                    _ => log::warn!("Malformed HDLC payload"),
                }
            }
        }
    }
}
