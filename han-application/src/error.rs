//! Error types re-exported from the core crate

pub use han_core::{HanError, HanResult};
