//! Coordinate model
//!
//! Value types shared by every other component: linear positions, segments,
//! genes, the dataset interval, arrays and the per-structure unmapped
//! metadata. Field names follow the JSON documents served to clients.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset on the reference linear genome (1 unit = 1 bp)
pub type Position = u64;

/// Structure identifier. Negative ids are legal and simply resolve to nothing.
pub type StructureId = i64;

/// Segment ordinal within a structure
pub type SegmentId = u64;

/// Array identifier, allocated as the count of arrays at insert time
pub type ArrayId = u64;

/// Inclusive span `[start, end]` on the linear genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A single position `[pos, pos]`
    pub fn point(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// True when `start > end`. Inverted spans come straight from user input.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A fixed-range slice of the linear genome tied to a 3D model position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub segid: SegmentId,
    pub startid: Position,
    pub endid: Position,
    pub length: u64,
    /// 3D coordinates, carried through unchanged
    #[serde(default)]
    pub start: [f64; 3],
    #[serde(default)]
    pub end: [f64; 3],
}

impl Segment {
    pub fn span(&self) -> Span {
        Span::new(self.startid, self.endid)
    }
}

/// A named collection of ordered segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub id: StructureId,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Gene annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    #[serde(rename = "gene_name", alias = "name")]
    pub name: String,
    pub start: Position,
    pub end: Position,
    pub length: u64,
    #[serde(rename = "gID", default)]
    pub gid: String,
    #[serde(default)]
    pub gene_type: String,
}

impl Gene {
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// Fixed segment width (base pairs per segment) of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetInterval(u64);

impl DatasetInterval {
    /// Returns `None` for a zero width
    pub fn new(width: u64) -> Option<Self> {
        (width > 0).then_some(Self(width))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Segment ordinal holding `pos`: `ceil(pos / interval)`
    ///
    /// # Examples
    /// ```
    /// use gentk_query::core::DatasetInterval;
    /// let interval = DatasetInterval::new(400_000).unwrap();
    /// assert_eq!(interval.segment_of(3_076_875), 8);
    /// assert_eq!(interval.segment_of(400_000), 1);
    /// ```
    pub fn segment_of(&self, pos: Position) -> SegmentId {
        pos.div_ceil(self.0)
    }

    /// Index of the stored bin holding `pos`: `floor(pos / interval)`
    pub fn bin_of(&self, pos: Position) -> u64 {
        pos / self.0
    }
}

/// Per-structure unmapped metadata: segment count plus the compact
/// `[[start,end],...]` exclusion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedMetadata {
    pub num_segments: usize,
    pub ranges: String,
}

/// Pointer to an external dense track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackLocator {
    /// Resource path, relative to the project root
    pub url: String,
    /// Chromosome (or track id) inside the resource
    pub chrom: String,
}

/// Storage of one dataset slice of an array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArraySource {
    /// Inline values ordered by segment ordinal (or fixed sampling bin)
    Values(Vec<Option<f64>>),
    /// Dense external track sampled through a range-sampler
    Sequence(TrackLocator),
}

impl ArraySource {
    pub fn is_track(&self) -> bool {
        matches!(self, ArraySource::Sequence(_))
    }
}

/// Data block of an array
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayData {
    #[serde(rename = "type", default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub dim: Option<u32>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    /// One source per dataset slice
    #[serde(default)]
    pub values: Vec<ArraySource>,
}

/// A stored numeric array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Array {
    pub id: ArrayId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_array_version")]
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub data: ArrayData,
}

pub(crate) fn default_array_version() -> String {
    "0.1".to_string()
}

impl Array {
    pub fn summary(&self) -> ArraySummary {
        ArraySummary {
            name: self.name.clone(),
            id: self.id,
            kind: self.kind.clone(),
            min: self.data.min,
            max: self.data.max,
        }
    }

    pub fn slice(&self, index: usize) -> Option<&ArraySource> {
        self.data.values.get(index)
    }
}

/// Array listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArraySummary {
    pub name: String,
    pub id: ArrayId,
    #[serde(rename = "type")]
    pub kind: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One cell of a contact map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub x: u64,
    pub y: u64,
    pub value: Option<f64>,
}
