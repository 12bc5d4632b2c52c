//! Rust backend output for `schemas/conformance.sdp`.
//!
//! `generated.rs` is checked in exactly as `bsdp gen schemas/conformance.sdp`
//! writes it; the tests under `tests/` hold it to the wire format.

pub mod generated;

/// The schema `generated` was produced from.
pub const SCHEMA: &str = include_str!("../schemas/conformance.sdp");
