//! Project tests
//!
//! Descriptor files on disk, scoped loading and the shared metadata cache.

pub mod tests_loader;
