//! Move-and-rewrite engine.
//!
//! Three passes share one [`RenameMap`](crate::rename_map::RenameMap):
//! - [`ReferenceRewriter`] points reference statements at new symbols
//! - [`FileRelocator`] copies files forward from committed content
//! - [`StubGenerator`] leaves deprecated subclasses at the old locations
//!
//! Every pass is safe to re-run; unchanged files are never rewritten.

mod relocate;
mod rewrite;
mod stubs;

pub use relocate::{
    rewrite_namespace_header, CommittedContent, FileRelocator, InMemorySnapshot, RelocateOptions,
};
pub use rewrite::{FileFailure, FileRewrite, ReferenceRewriter, RewriteReport};
pub use stubs::{
    StubGenerator, StubOptions, StubReport, StubWarning, DEFAULT_DEPRECATION_NOTICE,
    DEFAULT_STUB_TEMPLATE,
};
