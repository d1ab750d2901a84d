//! File format adapters
//!
//! Adapters for the files a project is served from (JSON project snapshots,
//! BigWig sequence tracks).

#[cfg(feature = "bigwig")]
pub mod bigwig;
pub mod project;

#[cfg(feature = "bigwig")]
pub use bigwig::{bin_means, BigWigSampler};
pub use project::{load_project, parse_project_bytes, parse_project_reader, ProjectSnapshot};
