//! Settings document model for the Nimbus web IDE shell.
//!
//! This crate provides the in-memory representation of a user's settings:
//!
//! - A tree of named sections with string key/value pairs
//! - Text serialization for persistence through the host channel
//! - The built-in default template used when no stored settings exist
//! - Typed errors for document parse/serialize failures

pub mod document;
pub mod error;
pub mod template;

// Re-export main types for convenience
pub use document::{ROOT_TAG, Section, SettingsDocument};
pub use error::DocumentError;
pub use template::{default_template, default_template_text};
