//! # axaml-base
//!
//! Core library for Avalonia XAML completion: caret-context parsers for
//! partially typed markup and a metadata graph harvested from compiled
//! libraries.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Output ranking, reference lists, metadata cache
//!   ↓
//! metadata  → Type graph, converter, resource indices
//!   ↓
//! assembly  → Library reader traits, JSON descriptor backend
//!   ↓
//! parser    → Tag/attribute, markup-extension and selector parsers
//!   ↓
//! base      → Primitives (TextRange, offsets, char classes)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → assembly → metadata → project)
// ============================================================================

/// Foundation types: TextRange, offset clamping, identifier chars
pub mod base;

/// Parsers: tag/attribute state, markup extensions, style selectors
pub mod parser;

/// Library reader abstraction and descriptor backend
pub mod assembly;

/// Metadata model and converter
pub mod metadata;

/// Project glue: output ranking, reference lists, cache
pub mod project;

// Re-export foundation types
pub use base::{TextRange, TextSize};

// Re-export the main entry points
pub use metadata::{Metadata, MetadataType, convert};
pub use parser::{MarkupExtensionParser, SelectorParser, XmlParser};
