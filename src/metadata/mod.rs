//! Metadata Model and Converter
//!
//! ```text
//! AssemblySession
//!     ↓ convert / convert_with_cancel
//! Metadata
//!   namespaces: "https://github.com/avaloniaui" → "Button" → TypeId
//!   types:      TypeId → MetadataType { properties, events, hints, ... }
//!   resources:  assembly → ResourceIndex
//! ```
//!
//! A built graph is immutable; share it behind an `Arc` and replace it
//! wholesale when the libraries change (see `project::MetadataCache`).

pub mod builtins;
mod converter;
mod error;
pub mod generics;
mod model;
mod options;
mod resources;
mod visibility;

pub use converter::{convert, convert_with_cancel, convert_with_options};
pub use error::ResourceIndexError;
pub use model::{
    CtorArgument, Metadata, MetadataEvent, MetadataProperty, MetadataType, TemplatePart, TypeId,
};
pub use options::ConverterOptions;
pub use resources::{
    AVALONIA_RESOURCES, ResourceEntry, ResourceIndex, XAML_INFO_PATH, parse_resource_index,
    read_resource_index,
};
pub use visibility::{VisibilityPolicy, grants_internals};
