//! # Connector Layer
//!
//! External integrations implementing application interfaces: one reqwest
//! adapter per LLM provider, plus a mock for tests and offline runs.

pub mod adapter;

pub use adapter::*;
