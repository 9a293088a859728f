//! Metadata tests
//!
//! Conversion of in-memory library sessions into the type graph:
//! - Registration, member harvesting and generic synthesis
//! - Visibility across libraries
//! - Resource URIs and the markup-resource index

pub mod tests_resources;
pub mod tests_visibility;
