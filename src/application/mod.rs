//! # Application Layer
//!
//! The completion capability interface and the use case orchestrating
//! validation, prompt rendering, and dispatch.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
