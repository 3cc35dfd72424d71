//! Configuration module for sanitizing and linkifying
//!
//! This module provides the option value types, their fluent builders and
//! JSON loading. Options are resolved into a [`Policy`](crate::Policy)
//! before any input is parsed.

// Sub-modules
pub mod builder;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{CleanOptionsBuilder, LinkifyOptionsBuilder};
pub use types::{AllowedAttributes, CleanOptions, LinkifyOptions, TextCallback};
