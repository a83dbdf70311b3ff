use crate::error::{HanError, HanResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern for the extended OBIS format "A-B:C.D.E*F" (the "*F" part is optional)
static EXTENDED_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})-(\d{1,3}):(\d{1,3})\.(\d{1,3})\.(\d{1,3})(?:\*(\d{1,3}))?$")
        .expect("extended OBIS pattern is valid")
});

/// OBIS (Object Identification System) code for identifying COSEM objects
///
/// OBIS codes are 6-byte identifiers used in DLMS/COSEM to uniquely identify
/// objects in a logical device, e.g. `1.0.1.7.0.255` for instantaneous
/// active power import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObisCode {
    bytes: [u8; 6],
}

impl ObisCode {
    /// Create a new OBIS code from the six value groups A through F
    pub fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self {
            bytes: [a, b, c, d, e, f],
        }
    }

    /// Create an OBIS code from a raw 6-byte array
    pub fn from_bytes(bytes: [u8; 6]) -> Self {
        Self { bytes }
    }

    /// Parse an OBIS code from string format
    ///
    /// Supports formats like:
    /// - "1.0.1.7.0.255"
    /// - "1-0:1.7.0*255" (the "*255" suffix may be omitted and defaults to 255)
    pub fn from_string(s: &str) -> HanResult<Self> {
        if let Ok(code) = Self::parse_dot_format(s) {
            return Ok(code);
        }

        if let Ok(code) = Self::parse_extended_format(s) {
            return Ok(code);
        }

        Err(HanError::InvalidData(format!(
            "Invalid OBIS code format: {}",
            s
        )))
    }

    fn parse_dot_format(s: &str) -> HanResult<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 6 {
            return Err(HanError::InvalidData(
                "Expected 6 dot-separated values".to_string(),
            ));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = part
                .parse::<u8>()
                .map_err(|_| HanError::InvalidData(format!("Invalid byte value: {}", part)))?;
        }

        Ok(Self { bytes })
    }

    fn parse_extended_format(s: &str) -> HanResult<Self> {
        let captures = EXTENDED_FORMAT
            .captures(s)
            .ok_or_else(|| HanError::InvalidData(format!("Not an extended OBIS code: {}", s)))?;

        let mut bytes = [0u8; 6];
        for i in 0..5 {
            let group = captures
                .get(i + 1)
                .ok_or_else(|| HanError::InvalidData("Missing OBIS value group".to_string()))?;
            bytes[i] = group
                .as_str()
                .parse::<u8>()
                .map_err(|_| HanError::InvalidData(format!("Invalid byte value: {}", group.as_str())))?;
        }

        // The F group defaults to 255 when no "*F" suffix is present
        bytes[5] = match captures.get(6) {
            Some(group) => group
                .as_str()
                .parse::<u8>()
                .map_err(|_| HanError::InvalidData(format!("Invalid byte value: {}", group.as_str())))?,
            None => 0xFF,
        };

        Ok(Self { bytes })
    }

    /// Get the OBIS code as a byte array
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.bytes
    }

    /// Get the OBIS code as a copied byte array
    pub fn to_bytes(&self) -> [u8; 6] {
        self.bytes
    }

    /// Compare this code byte-for-byte against a 6-byte identifier field
    pub fn matches(&self, identifier: &[u8]) -> bool {
        identifier.len() == 6 && identifier == self.bytes.as_slice()
    }

    /// Get the A value (first byte)
    pub fn a(&self) -> u8 {
        self.bytes[0]
    }

    /// Get the B value (second byte)
    pub fn b(&self) -> u8 {
        self.bytes[1]
    }

    /// Get the C value (third byte)
    pub fn c(&self) -> u8 {
        self.bytes[2]
    }

    /// Get the D value (fourth byte)
    pub fn d(&self) -> u8 {
        self.bytes[3]
    }

    /// Get the E value (fifth byte)
    pub fn e(&self) -> u8 {
        self.bytes[4]
    }

    /// Get the F value (sixth byte)
    pub fn f(&self) -> u8 {
        self.bytes[5]
    }
}

impl fmt::Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}.{}",
            self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3], self.bytes[4],
            self.bytes[5]
        )
    }
}
