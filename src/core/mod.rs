//! Core coordinate resolution functionality
//!
//! This module contains the coordinate model, the range expression parser,
//! the interval overlap matcher, the resolver built on them, the unmapped
//! bitmap codec and the array sampler.

mod error;
pub mod io;
mod model;
mod overlap;
mod range;
mod repository;
mod resolver;
mod sampler;
mod unmapped;

pub use error::{
    DecodeError, Entity, GentkError, ProjectError, RangeParseError, RangeResult, Result,
    SamplerError, StorageError, StorageResult,
};
pub use model::{
    Array, ArrayData, ArrayId, ArraySource, ArraySummary, Contact, DatasetInterval, Gene,
    Position, Segment, SegmentId, Span, Structure, StructureId, TrackLocator, UnmappedMetadata,
};
pub use overlap::{OverlapMode, SpanEntry, SpanIndex};
pub use range::{parse_range_expression, split_name_list};
pub use repository::{MemoryRepository, NewArray, Repository, SliceSelector};
pub use resolver::{CoordinateResolver, GENE_SEGMENT_MODE, LOCATION_GENE_MODE};
pub use sampler::{
    check_sample_count, fetch_array, normalize_missing, sample_array, slice_indices,
    ArraySliceView, NoSampler, RangeSampler, SampleRequest, MAX_SAMPLES,
};
pub use unmapped::{decode_unmapped, encode_unmapped, unmapped_mask};
