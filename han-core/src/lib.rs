//! Core types and utilities for HAN smart meter telemetry
//!
//! This crate provides the fundamental types, error handling, and decoded
//! value representations used throughout the HAN decoder stack.

pub mod error;
pub mod obis_code;
pub mod datatypes;

pub use error::{HanError, HanResult};
pub use obis_code::ObisCode;
pub use datatypes::{CosemDateTime, DstStatus, MeterValue};
