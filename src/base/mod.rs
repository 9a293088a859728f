//! Foundation types for the markup toolchain.
//!
//! This module provides the small set of primitives shared by the parsers
//! and the metadata model:
//! - [`TextRange`], [`TextSize`] - byte spans into caller-owned text
//! - [`span`] / [`clamp_offset`] - offset helpers used by every parser
//! - [`chars`] - character classes for XML names and selector identifiers
//!
//! This module has NO dependencies on other crate modules.

pub mod chars;
mod position;

pub use position::{clamp_offset, range_text, span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
