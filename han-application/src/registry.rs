//! Listener registry and the COSEM notification body walk

use crate::cosem::{record_length, MIN_RECORD_LEN, OBIS_LENGTH, TAG_OCTET_STRING, TAG_STRUCT};
use crate::listener::ObisListener;
use crate::notification::DataNotification;

/// Ordered collection of OBIS listeners with first-match-wins dispatch
///
/// Listeners are registered once at setup and held for the process
/// lifetime. Duplicate identifiers are not detected; the listener
/// registered first receives the record.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn ObisListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener; iteration order is registration order
    pub fn register(&mut self, listener: Box<dyn ObisListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Offer a record to the listeners; the first match decodes it
    pub fn dispatch(&mut self, record: &[u8]) -> bool {
        for listener in &mut self.listeners {
            if listener.matches(record) {
                return listener.decode(record);
            }
        }
        false
    }

    /// Decode a complete Data-Notification payload
    ///
    /// Parses the APDU header, walks the COSEM body record by record, and
    /// dispatches each plausible record. Returns false if the header or the
    /// body opening is malformed; records dispatched before a mid-body error
    /// remain published.
    pub fn decode_notification(&mut self, payload: &[u8]) -> bool {
        let notification = match DataNotification::parse(payload) {
            Ok(notification) => notification,
            Err(e) => {
                log::warn!("{}", e);
                return false;
            }
        };
        log::debug!(
            "Data notification: invoke id 0x{:08X}, declared body length {}",
            notification.invoke_id,
            notification.declared_body_len
        );

        let consumed = self.decode_body(notification.body);
        if consumed == 0 {
            return false;
        }

        let pos = payload.len() - notification.body.len() + consumed;
        if pos == payload.len() {
            log::debug!("Entire notification decoded");
        } else {
            log::warn!(
                "Stray bytes in notification: payload {} bytes, decoded {}",
                payload.len(),
                pos
            );
        }
        true
    }

    /// Walk the COSEM body, dispatching each record; returns bytes consumed
    fn decode_body(&mut self, body: &[u8]) -> usize {
        if body.len() < 4 {
            log::warn!("COSEM body too small");
            return 0;
        }
        // Every record is a struct whose first element is the 6-byte OBIS
        // identifier octet string
        if body[0] != TAG_STRUCT || body[2] != TAG_OCTET_STRING || body[3] != OBIS_LENGTH {
            log::warn!(
                "Invalid COSEM body start: {:02x}{:02x}{:02x}{:02x}",
                body[0],
                body[1],
                body[2],
                body[3]
            );
            return 0;
        }

        let mut pos = 0;
        while pos < body.len() && body[pos] == TAG_STRUCT {
            let record_len = match record_length(&body[pos..]) {
                Ok(len) => len,
                Err(e) => {
                    log::warn!("Aborting body walk at offset {}: {}", pos, e);
                    return 0;
                }
            };
            if record_len > body.len() - pos {
                log::warn!("Record at offset {} overruns the body", pos);
                return 0;
            }
            if record_len >= MIN_RECORD_LEN {
                self.dispatch(&body[pos..pos + record_len]);
            }
            pos += record_len;
        }
        pos
    }
}
