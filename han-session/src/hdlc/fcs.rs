//! Frame Check Sequence (FCS) calculation for HDLC

/// FCS calculation constants
const INITIAL_FCS: u16 = 0xFFFF;
const KEY: u16 = 0x8408; // Bit-reversed 0x1021

/// Precomputed FCS table
static FCS_TABLE: once_cell::sync::Lazy<[u16; 256]> = once_cell::sync::Lazy::new(|| {
    let mut table = [0u16; 256];
    for b in 0..=0xFFu16 {
        let mut v = b;
        for _ in 0..8 {
            if (v & 1) == 1 {
                v = (v >> 1) ^ KEY;
            } else {
                v >>= 1;
            }
        }
        table[b as usize] = v;
    }
    table
});

/// Frame Check Sequence calculator (CRC-16/X.25)
///
/// Seed 0xFFFF, reflected polynomial, result transmitted inverted in
/// little-endian byte order. Used for both the header check sequence (HCS)
/// and the trailing frame check sequence (FCS).
#[derive(Debug)]
pub struct FcsCalc {
    fcs_value: u16,
}

impl FcsCalc {
    /// Create a new FCS calculator
    pub fn new() -> Self {
        Self {
            fcs_value: INITIAL_FCS,
        }
    }

    /// Reset the FCS value to initial state
    pub fn reset(&mut self) {
        self.fcs_value = INITIAL_FCS;
    }

    /// Update the FCS value with a single byte
    pub fn update(&mut self, data: u8) {
        self.fcs_value =
            (self.fcs_value >> 8) ^ FCS_TABLE[((self.fcs_value ^ data as u16) & 0xFF) as usize];
    }

    /// Update the FCS value with multiple bytes
    pub fn update_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Get the current raw (uninverted) FCS value
    pub fn value(&self) -> u16 {
        self.fcs_value
    }

    /// Get the FCS value as transmitted: inverted, little-endian
    pub fn fcs_value_bytes(&self) -> [u8; 2] {
        let inv_fcs = self.fcs_value ^ 0xFFFF;
        [(inv_fcs & 0xFF) as u8, (inv_fcs >> 8) as u8]
    }

    /// Compute the inverted checksum of a byte slice in one call
    pub fn checksum(data: &[u8]) -> u16 {
        let mut calc = Self::new();
        calc.update_bytes(data);
        calc.fcs_value ^ 0xFFFF
    }
}

impl Default for FcsCalc {
    fn default() -> Self {
        Self::new()
    }
}
