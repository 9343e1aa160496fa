//! Shared fixtures and builders for integration tests.

#![allow(dead_code)]

pub mod model_builders;
