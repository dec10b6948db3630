//! Core Components
//!
//! Transport abstraction and wire-level header names.

pub mod headers;
pub mod transport;

pub use transport::*;
