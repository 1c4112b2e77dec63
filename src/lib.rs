//! h1wire - HTTP/1.x message model and wire codec
//!
//! This crate provides a mutable HTTP/1.x message type, its serialization to
//! wire format, and a single-pass state machine that parses a complete wire
//! buffer back into a message.

mod log;

pub mod http;
