//! gentk-query - genomic coordinate resolution and array sampling
//!
//! Answers coordinate-translation queries over a linearized genome: given
//! genomic locations, structure segments or gene names, it resolves the
//! overlapping counterparts in the other two representations. It also
//! slices per-segment arrays by genomic range and downsamples dense
//! sequence tracks.
//!
//! # Features
//!
//! - Range expressions such as `"7,8-10"` for segment and location queries
//! - Interval overlap lookups backed by rust-lapper
//! - Unmapped-segment bitmap decoding and encoding
//! - JSON project snapshots (plain, gzip, bzip2)
//! - BigWig downsampling via bigtools (feature `bigwig`)
//!
//! # Example
//!
//! ```ignore
//! use gentk_query::{load_project, NoSampler, QueryEngine};
//!
//! let repo = load_project("project.json.gz")?;
//! let engine = QueryEngine::new(&repo, &NoSampler, repo.project_id());
//!
//! let genes = engine.genes_for_segments(0, "7,8-10")?;
//! let segments = engine.segments_for_genes(0, "Btbd35f23")?;
//! ```

pub mod api;
pub mod core;
pub mod formats;

// Re-export commonly used types
pub use api::QueryEngine;
pub use crate::core::{
    CoordinateResolver, GentkError, MemoryRepository, NoSampler, OverlapMode, RangeSampler,
    Repository, Span,
};
pub use formats::load_project;
#[cfg(feature = "bigwig")]
pub use formats::BigWigSampler;
