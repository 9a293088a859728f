//! Shared test fixtures
//!
//! - **library_fixtures**: in-memory library descriptors shaped like the
//!   Avalonia core libraries, plus resource blob builders

pub mod library_fixtures;
