//! Error types for gentk-query
//!
//! Defines all error types used throughout the library.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::model::{ArrayId, SegmentId, StructureId};

/// Main error type for gentk-query operations
#[derive(Debug, Error)]
pub enum GentkError {
    /// Malformed range expression
    #[error("Range parse error: {0}")]
    RangeParse(#[from] RangeParseError),

    /// Malformed unmapped-segment encoding
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Unknown entity on a single-entity lookup
    #[error("Not found: {0}")]
    NotFound(Entity),

    /// Storage collaborator failure or timeout
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Range-sampler failure
    #[error("Sampler error: {0}")]
    Sampler(#[from] SamplerError),

    /// Project snapshot loading errors
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),
}

impl GentkError {
    /// True for errors the caller can correct by changing the request
    /// (4xx at an HTTP boundary); everything else is a server-side failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            GentkError::RangeParse(_)
                | GentkError::Decode(_)
                | GentkError::NotFound(_)
                | GentkError::Sampler(SamplerError::TooManySamples { .. })
        )
    }
}

impl From<StorageError> for GentkError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(entity) => GentkError::NotFound(entity),
            StorageError::Unavailable(message) => GentkError::StorageUnavailable(message),
        }
    }
}

/// Errors produced by the range expression parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    /// The expression contained no tokens at all
    #[error("empty range expression")]
    Empty,

    /// A token between two commas was empty
    #[error("empty token at position {position}")]
    EmptyToken { position: usize },

    /// A bound was not a non-negative integer
    #[error("invalid number in token '{token}'")]
    InvalidNumber { token: String },

    /// More than one hyphen in a token
    #[error("too many hyphens in token '{token}'")]
    TooManyHyphens { token: String },
}

/// Errors produced while decoding an unmapped-segment range list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid unmapped range list '{encoded}': {message}")]
    InvalidEncoding { encoded: String, message: String },
}

/// Storage collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The requested row does not exist
    #[error("{0} not found")]
    NotFound(Entity),

    /// Backend failure or timeout
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Entity named in a NotFound condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Project(String),
    Segment { structure: StructureId, segid: SegmentId },
    Gene(String),
    UnmappedMetadata(StructureId),
    Array(ArrayId),
    ArraySlice { array: ArrayId, slice: usize },
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Project(id) => write!(f, "project '{}'", id),
            Entity::Segment { structure, segid } => {
                write!(f, "segment {} of structure {}", segid, structure)
            }
            Entity::Gene(name) => write!(f, "gene '{}'", name),
            Entity::UnmappedMetadata(id) => write!(f, "unmapped metadata for structure {}", id),
            Entity::Array(id) => write!(f, "array {}", id),
            Entity::ArraySlice { array, slice } => write!(f, "slice {} of array {}", slice, array),
        }
    }
}

/// Errors reported by a range-sampler implementation
#[derive(Debug, Error)]
pub enum SamplerError {
    /// Track resource could not be opened
    #[error("cannot open track '{path}': {message}")]
    Open { path: PathBuf, message: String },

    /// Chromosome/track id missing from the resource
    #[error("track '{track}' not present in '{path}'")]
    UnknownTrack { path: PathBuf, track: String },

    /// Error while reading intervals
    #[error("read error: {0}")]
    Read(String),

    /// No sampler is configured for dense tracks
    #[error("no range-sampler available for '{0}'")]
    Unsupported(String),

    /// Bin count above the per-request limit
    #[error("{requested} samples requested, at most {max} allowed")]
    TooManySamples { requested: usize, max: usize },
}

/// Errors that can occur while loading a project snapshot
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File not found
    #[error("Project snapshot not found: {0}")]
    FileNotFound(PathBuf),

    /// Invalid JSON content
    #[error("Invalid project snapshot: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Dataset interval must be positive
    #[error("Invalid dataset interval: {0}")]
    InvalidInterval(u64),

    /// I/O error during loading
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for gentk-query operations
pub type Result<T> = std::result::Result<T, GentkError>;

/// Result type alias for repository operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result type alias for range parsing
pub type RangeResult<T> = std::result::Result<T, RangeParseError>;
