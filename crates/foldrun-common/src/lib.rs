//! foldrun-common — Shared types, errors, and the outbound HTTP client used across foldrun crates.

pub mod error;
pub mod job_spec;
pub mod sandbox;

// Re-export commonly used types
pub use error::{FoldrunError, Result};
pub use job_spec::{ChainIds, Entity, JobDocument, LigandEntity, PolymerEntity};
