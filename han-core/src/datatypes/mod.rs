//! Decoded value types for HAN meter telemetry

pub mod meter_value;
pub mod cosem_date_time;

pub use cosem_date_time::{CosemDateTime, DstStatus};
pub use meter_value::MeterValue;
