//! cs2forge Core Library
//!
//! This crate provides common types, utilities, and error handling
//! shared across all cs2forge components.

pub mod error;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use types::*;
