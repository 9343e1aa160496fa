//! Interchange layer tests
//!
//! Tests for XMI ingestion:
//! - Decoding and the single fatal error
//! - Model extraction from tool-specific exports, XMI 1.x included
//! - Depth and package path invariants

mod tests_decode;
mod tests_invariants;
mod tests_vendors;
mod tests_xmi1;
