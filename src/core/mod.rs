// Public modules
pub mod config;
pub mod error;
pub mod git;
pub mod grid_docs;
pub mod layout;
pub mod output;
pub mod refactor;
pub mod rename_map;
pub mod walker;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{BatchResult, BatchResultItem};
