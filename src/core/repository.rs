//! Storage collaborator interface
//!
//! The engine never builds query text; it asks a [`Repository`] for typed
//! rows and derives every answer from them. [`MemoryRepository`] is the
//! in-process implementation backing the CLI and the tests.

use crate::core::error::{Entity, StorageError, StorageResult};
use crate::core::model::{
    default_array_version, Array, ArrayData, ArrayId, ArraySource, ArraySummary, Contact,
    DatasetInterval, Gene, Segment, SegmentId, Structure, StructureId, UnmappedMetadata,
};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;
use std::sync::RwLock;

/// Which part of an array slice to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceSelector {
    /// Dataset slice index inside the array's data block
    pub slice: usize,
    /// Index range within the slice; `None` reads the whole slice
    pub range: Option<Range<usize>>,
}

impl SliceSelector {
    pub fn whole(slice: usize) -> Self {
        Self { slice, range: None }
    }

    pub fn range(slice: usize, range: Range<usize>) -> Self {
        Self {
            slice,
            range: Some(range),
        }
    }
}

/// Read-only storage contract consumed by the engine
///
/// Implementations must be safe to share across threads: queries run
/// concurrently and hold no state of their own.
pub trait Repository: Send + Sync {
    /// Segments of a structure ordered by segid; empty for unknown structures
    fn segments_of(&self, structure: StructureId) -> StorageResult<Vec<Segment>>;

    fn segment(&self, structure: StructureId, segid: SegmentId) -> StorageResult<Segment>;

    /// All genes, ordered by name
    fn genes(&self) -> StorageResult<Vec<Gene>>;

    fn gene(&self, name: &str) -> StorageResult<Gene>;

    fn unmapped_metadata(&self, structure: StructureId) -> StorageResult<UnmappedMetadata>;

    fn array_metadata(&self, id: ArrayId) -> StorageResult<Array>;

    /// Raw values of an inline array slice. Missing values may be `None`
    /// or NaN; callers normalize.
    fn array_values(&self, id: ArrayId, selector: &SliceSelector) -> StorageResult<Vec<Option<f64>>>;

    fn dataset_interval(&self, project: &str) -> StorageResult<DatasetInterval>;

    /// Summaries of arrays of one type, ordered by id
    fn arrays_of_type(&self, kind: &str) -> StorageResult<Vec<ArraySummary>>;

    /// Contact records of a contact map; empty for unknown maps
    fn contacts(&self, map: i64) -> StorageResult<Vec<Contact>>;

    /// Dataset ids of the project, sorted
    fn dataset_ids(&self) -> StorageResult<Vec<i64>>;
}

/// Definition of an array to append
#[derive(Debug, Clone, PartialEq)]
pub struct NewArray {
    pub name: String,
    pub kind: String,
    pub tags: Vec<String>,
    pub data_type: Option<String>,
    pub dim: Option<u32>,
    pub values: Vec<Option<f64>>,
}

/// In-memory repository holding a whole project
#[derive(Debug)]
pub struct MemoryRepository {
    project_id: String,
    interval: DatasetInterval,
    datasets: Vec<i64>,
    structures: HashMap<StructureId, Vec<Segment>>,
    /// Gene name -> gene, ordered by name
    genes: BTreeMap<String, Gene>,
    unmapped: HashMap<StructureId, UnmappedMetadata>,
    contacts: HashMap<i64, Vec<Contact>>,
    /// Append-only; the position of an array is its id
    arrays: RwLock<Vec<Array>>,
}

impl MemoryRepository {
    pub fn new(project_id: impl Into<String>, interval: DatasetInterval) -> Self {
        Self {
            project_id: project_id.into(),
            interval,
            datasets: vec![0],
            structures: HashMap::new(),
            genes: BTreeMap::new(),
            unmapped: HashMap::new(),
            contacts: HashMap::new(),
            arrays: RwLock::new(Vec::new()),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn interval(&self) -> DatasetInterval {
        self.interval
    }

    pub fn set_datasets(&mut self, mut datasets: Vec<i64>) {
        datasets.sort_unstable();
        datasets.dedup();
        self.datasets = datasets;
    }

    /// Add a structure; its segments are kept ordered by segid
    pub fn insert_structure(&mut self, structure: Structure) {
        let mut segments = structure.segments;
        segments.sort_by_key(|s| s.segid);
        self.structures.insert(structure.id, segments);
    }

    /// Add a gene; a gene with the same name is replaced
    pub fn insert_gene(&mut self, gene: Gene) {
        self.genes.insert(gene.name.clone(), gene);
    }

    pub fn insert_unmapped(&mut self, structure: StructureId, metadata: UnmappedMetadata) {
        self.unmapped.insert(structure, metadata);
    }

    pub fn insert_contacts(&mut self, map: i64, contacts: Vec<Contact>) {
        self.contacts.entry(map).or_default().extend(contacts);
    }

    /// Store a fully-formed array, reassigning its id to the next free one
    pub fn insert_array(&mut self, mut array: Array) -> ArrayId {
        let arrays = self.arrays.get_mut().unwrap_or_else(|e| e.into_inner());
        array.id = arrays.len() as ArrayId;
        let id = array.id;
        arrays.push(array);
        id
    }

    /// Append a new array and return its id (the count of arrays before
    /// the insert). Id allocation is serialized by the write lock, so ids
    /// stay unique and gapless under concurrent appends.
    ///
    /// The same values are stored for every dataset slice.
    pub fn append_array(&self, new: NewArray) -> StorageResult<ArrayId> {
        let (min, max) = value_bounds(&new.values);
        let slices = vec![ArraySource::Values(new.values); self.datasets.len().max(1)];

        let mut arrays = self
            .arrays
            .write()
            .map_err(|_| StorageError::Unavailable("array store lock poisoned".to_string()))?;
        let id = arrays.len() as ArrayId;
        arrays.push(Array {
            id,
            name: new.name,
            kind: new.kind,
            version: default_array_version(),
            tags: new.tags,
            data: ArrayData {
                data_type: new.data_type,
                dim: new.dim,
                min,
                max,
                values: slices,
            },
        });

        log::debug!("appended array {}", id);
        Ok(id)
    }

    pub fn array_count(&self) -> usize {
        self.arrays.read().map(|a| a.len()).unwrap_or(0)
    }

    fn read_arrays(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, Vec<Array>>> {
        self.arrays
            .read()
            .map_err(|_| StorageError::Unavailable("array store lock poisoned".to_string()))
    }
}

fn value_bounds(values: &[Option<f64>]) -> (Option<f64>, Option<f64>) {
    values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((None, None), |(min, max): (Option<f64>, Option<f64>), &v| {
            (
                Some(min.map_or(v, |m| m.min(v))),
                Some(max.map_or(v, |m| m.max(v))),
            )
        })
}

impl Repository for MemoryRepository {
    fn segments_of(&self, structure: StructureId) -> StorageResult<Vec<Segment>> {
        Ok(self.structures.get(&structure).cloned().unwrap_or_default())
    }

    fn segment(&self, structure: StructureId, segid: SegmentId) -> StorageResult<Segment> {
        self.structures
            .get(&structure)
            .and_then(|segments| {
                segments
                    .binary_search_by_key(&segid, |s| s.segid)
                    .ok()
                    .map(|i| segments[i].clone())
            })
            .ok_or(StorageError::NotFound(Entity::Segment { structure, segid }))
    }

    fn genes(&self) -> StorageResult<Vec<Gene>> {
        Ok(self.genes.values().cloned().collect())
    }

    fn gene(&self, name: &str) -> StorageResult<Gene> {
        self.genes
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(Entity::Gene(name.to_string())))
    }

    fn unmapped_metadata(&self, structure: StructureId) -> StorageResult<UnmappedMetadata> {
        self.unmapped
            .get(&structure)
            .cloned()
            .ok_or(StorageError::NotFound(Entity::UnmappedMetadata(structure)))
    }

    fn array_metadata(&self, id: ArrayId) -> StorageResult<Array> {
        let arrays = self.read_arrays()?;
        usize::try_from(id)
            .ok()
            .and_then(|i| arrays.get(i))
            .cloned()
            .ok_or(StorageError::NotFound(Entity::Array(id)))
    }

    fn array_values(&self, id: ArrayId, selector: &SliceSelector) -> StorageResult<Vec<Option<f64>>> {
        let arrays = self.read_arrays()?;
        let array = usize::try_from(id)
            .ok()
            .and_then(|i| arrays.get(i))
            .ok_or(StorageError::NotFound(Entity::Array(id)))?;

        let missing_slice = || {
            StorageError::NotFound(Entity::ArraySlice {
                array: id,
                slice: selector.slice,
            })
        };
        let values = match array.slice(selector.slice) {
            Some(ArraySource::Values(values)) => values,
            // Dense tracks are served by a range-sampler, not by the store
            Some(ArraySource::Sequence(_)) | None => return Err(missing_slice()),
        };

        let selected = match &selector.range {
            Some(range) => {
                let start = range.start.min(values.len());
                let end = range.end.clamp(start, values.len());
                &values[start..end]
            }
            None => &values[..],
        };
        Ok(selected.to_vec())
    }

    fn dataset_interval(&self, project: &str) -> StorageResult<DatasetInterval> {
        if project == self.project_id {
            Ok(self.interval)
        } else {
            Err(StorageError::NotFound(Entity::Project(project.to_string())))
        }
    }

    fn arrays_of_type(&self, kind: &str) -> StorageResult<Vec<ArraySummary>> {
        let arrays = self.read_arrays()?;
        Ok(arrays
            .iter()
            .filter(|a| a.kind == kind)
            .map(Array::summary)
            .collect())
    }

    fn contacts(&self, map: i64) -> StorageResult<Vec<Contact>> {
        Ok(self.contacts.get(&map).cloned().unwrap_or_default())
    }

    fn dataset_ids(&self) -> StorageResult<Vec<i64>> {
        Ok(self.datasets.clone())
    }
}
