//! OBIS listeners: the consumers records are dispatched to

use crate::cosem::record_identifier;
use crate::value::decode_value;
use han_core::datatypes::MeterValue;
use han_core::ObisCode;

/// Sink a listener publishes decoded values to
///
/// One sink per listener; a single value per successful decode, no batching
/// and no acknowledgment.
#[cfg_attr(test, mockall::automock)]
pub trait ValueSink {
    fn publish(&mut self, value: MeterValue);
}

impl<F: FnMut(MeterValue)> ValueSink for F {
    fn publish(&mut self, value: MeterValue) {
        self(value)
    }
}

/// A consumer of records carrying one particular OBIS identifier
///
/// The registry probes `matches` in registration order and hands the record
/// to the first listener that claims it. `decode` performs the value
/// decoding and publication, returning whether it succeeded.
pub trait ObisListener {
    /// Check if the record's identifier field equals this listener's code
    fn matches(&self, record: &[u8]) -> bool;

    /// Decode the record's value and publish it
    fn decode(&mut self, record: &[u8]) -> bool;
}

fn identifier_matches(code: &ObisCode, record: &[u8]) -> bool {
    record_identifier(record).is_some_and(|identifier| code.matches(identifier))
}

/// Listener for scalar (numeric) registers
pub struct ObisSensor {
    code: ObisCode,
    sink: Box<dyn ValueSink>,
}

impl ObisSensor {
    pub fn new(code: ObisCode, sink: Box<dyn ValueSink>) -> Self {
        Self { code, sink }
    }

    /// The OBIS code this sensor listens for
    pub fn code(&self) -> &ObisCode {
        &self.code
    }
}

impl ObisListener for ObisSensor {
    fn matches(&self, record: &[u8]) -> bool {
        identifier_matches(&self.code, record)
    }

    fn decode(&mut self, record: &[u8]) -> bool {
        match decode_value(record) {
            Ok(value) if value.is_timestamp() => {
                log::warn!("{}: expected a scalar, got a timestamp", self.code);
                false
            }
            Ok(value) => {
                self.sink.publish(value);
                true
            }
            Err(e) => {
                log::warn!("{}: {}", self.code, e);
                false
            }
        }
    }
}

/// Listener for the meter clock register
pub struct TimeSensor {
    code: ObisCode,
    sink: Box<dyn ValueSink>,
}

impl TimeSensor {
    pub fn new(code: ObisCode, sink: Box<dyn ValueSink>) -> Self {
        Self { code, sink }
    }

    /// The OBIS code this sensor listens for
    pub fn code(&self) -> &ObisCode {
        &self.code
    }
}

impl ObisListener for TimeSensor {
    fn matches(&self, record: &[u8]) -> bool {
        identifier_matches(&self.code, record)
    }

    fn decode(&mut self, record: &[u8]) -> bool {
        match decode_value(record) {
            Ok(value @ MeterValue::Timestamp(_)) => {
                self.sink.publish(value);
                true
            }
            Ok(_) => {
                log::warn!("{}: expected a timestamp", self.code);
                false
            }
            Err(e) => {
                log::warn!("{}: {}", self.code, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosem::{TAG_OCTET_STRING, TAG_STRUCT, TAG_UNSIGNED32};
    use mockall::predicate::eq;

    fn scalar_record(obis: [u8; 6], value: u32) -> Vec<u8> {
        let mut record = vec![TAG_STRUCT, 2, TAG_OCTET_STRING, 6];
        record.extend_from_slice(&obis);
        record.push(TAG_UNSIGNED32);
        record.extend_from_slice(&value.to_be_bytes());
        record
    }

    fn time_record(obis: [u8; 6]) -> Vec<u8> {
        let mut record = vec![TAG_STRUCT, 2, TAG_OCTET_STRING, 6];
        record.extend_from_slice(&obis);
        record.extend_from_slice(&[
            TAG_OCTET_STRING, 0x0C, 0x07, 0xE7, 0x0C, 0x10, 0x06, 0x0A, 0x07, 0x3B, 0x00,
            0xFF, 0x80, 0x00,
        ]);
        record
    }

    #[test]
    fn test_matches_compares_identifier_field() {
        let sensor = ObisSensor::new(
            ObisCode::new(1, 0, 1, 7, 0, 255),
            Box::new(|_: MeterValue| {}),
        );
        assert!(sensor.matches(&scalar_record([1, 0, 1, 7, 0, 255], 1)));
        assert!(!sensor.matches(&scalar_record([1, 0, 2, 7, 0, 255], 1)));
        assert!(!sensor.matches(&[TAG_STRUCT, 2])); // too short to hold an identifier
    }

    #[test]
    fn test_scalar_sensor_publishes() {
        let mut sink = MockValueSink::new();
        sink.expect_publish()
            .with(eq(MeterValue::Unsigned32(1122)))
            .times(1)
            .return_const(());

        let mut sensor = ObisSensor::new(ObisCode::new(1, 0, 1, 7, 0, 255), Box::new(sink));
        assert!(sensor.decode(&scalar_record([1, 0, 1, 7, 0, 255], 1122)));
    }

    #[test]
    fn test_scalar_sensor_rejects_timestamp() {
        let mut sink = MockValueSink::new();
        sink.expect_publish().times(0);

        let mut sensor = ObisSensor::new(ObisCode::new(0, 0, 1, 0, 0, 255), Box::new(sink));
        assert!(!sensor.decode(&time_record([0, 0, 1, 0, 0, 255])));
    }

    #[test]
    fn test_time_sensor_publishes_timestamp() {
        let mut sink = MockValueSink::new();
        sink.expect_publish()
            .with(eq(MeterValue::Timestamp(1_702_721_279)))
            .times(1)
            .return_const(());

        let mut sensor = TimeSensor::new(ObisCode::new(0, 0, 1, 0, 0, 255), Box::new(sink));
        assert!(sensor.decode(&time_record([0, 0, 1, 0, 0, 255])));
    }

    #[test]
    fn test_time_sensor_rejects_scalar() {
        let mut sink = MockValueSink::new();
        sink.expect_publish().times(0);

        let mut sensor = TimeSensor::new(ObisCode::new(0, 0, 1, 0, 0, 255), Box::new(sink));
        assert!(!sensor.decode(&scalar_record([0, 0, 1, 0, 0, 255], 7)));
    }

    #[test]
    fn test_unknown_value_tag_publishes_nothing() {
        let mut sink = MockValueSink::new();
        sink.expect_publish().times(0);

        let mut record = scalar_record([1, 0, 1, 7, 0, 255], 0);
        record[10] = 0x55; // unrecognized value tag

        let mut sensor = ObisSensor::new(ObisCode::new(1, 0, 1, 7, 0, 255), Box::new(sink));
        assert!(!sensor.decode(&record));
    }
}
