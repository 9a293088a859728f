//! Project-level glue: which libraries to read and keeping the result.
//!
//! - **outputs**: rank per-framework build outputs
//! - **references**: line-oriented reference lists
//! - **loader**: one scoped conversion run
//! - **cache**: shared graphs keyed by library path list

mod cache;
mod loader;
mod outputs;
mod references;

pub use cache::MetadataCache;
pub use loader::load_metadata;
pub use outputs::{FrameworkRank, framework_of_path, framework_rank, rank_outputs};
pub use references::{library_paths, parse_reference_list, read_reference_list};
