//! Transport layer for HAN meter telemetry
//!
//! This crate provides the byte source abstraction the decoder polls. The
//! decode path is single-threaded and run-to-completion, so the interface is
//! synchronous: a host reads from its serial port (or any other physical
//! layer) and the decoder pulls one byte at a time.

pub mod source;

pub use source::{BufferedSource, ByteSource};
