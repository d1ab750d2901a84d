//! Query facade
//!
//! [`QueryEngine`] exposes every logical query of a project and returns the
//! JSON documents an HTTP layer serves (`genes`, `segments`, `unmapped`,
//! `data`, `contacts`, `arrays`, `segmentids`). Missing numeric values are
//! `None` and serialize as `null`.

use crate::core::{
    fetch_array, sample_array, unmapped_mask, ArrayId, ArraySummary, Contact, CoordinateResolver,
    Gene, Position, RangeSampler, Repository, Result, Segment, SegmentId, StructureId,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenesResponse {
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<SegmentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecordsResponse {
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentIdsResponse {
    pub segmentids: Vec<SegmentId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnmappedResponse {
    pub unmapped: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse {
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraysResponse {
    pub arrays: Vec<ArraySummary>,
}

/// Data block of a fetched array slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayDataResponse {
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    pub dim: Option<u32>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub values: Vec<Option<f64>>,
}

/// A fetched array with one slice resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayResponse {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub tags: Vec<String>,
    pub data: ArrayDataResponse,
}

/// All queries of one project over a repository and a range-sampler
pub struct QueryEngine<'a, R: ?Sized, S: ?Sized> {
    repo: &'a R,
    sampler: &'a S,
    project: String,
}

impl<'a, R, S> QueryEngine<'a, R, S>
where
    R: Repository + ?Sized,
    S: RangeSampler + ?Sized,
{
    pub fn new(repo: &'a R, sampler: &'a S, project: impl Into<String>) -> Self {
        Self {
            repo,
            sampler,
            project: project.into(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    fn resolver(&self) -> CoordinateResolver<'a, R> {
        CoordinateResolver::new(self.repo)
    }

    /// Segment width of the project
    pub fn interval(&self) -> Result<u64> {
        Ok(self.repo.dataset_interval(&self.project)?.get())
    }

    pub fn dataset_ids(&self) -> Result<Vec<i64>> {
        Ok(self.repo.dataset_ids()?)
    }

    /// All gene names, sorted and distinct
    pub fn genes(&self) -> Result<GenesResponse> {
        let mut genes: Vec<String> = self.repo.genes()?.into_iter().map(|g| g.name).collect();
        genes.sort();
        genes.dedup();
        Ok(GenesResponse { genes })
    }

    pub fn gene(&self, name: &str) -> Result<Gene> {
        Ok(self.repo.gene(name)?)
    }

    pub fn genes_for_locations(&self, locations: &str) -> Result<GenesResponse> {
        let genes = self.resolver().genes_for_locations(locations)?;
        Ok(GenesResponse { genes })
    }

    pub fn genes_for_segments(&self, structure: StructureId, segments: &str) -> Result<GenesResponse> {
        let genes = self.resolver().genes_for_segments(structure, segments)?;
        Ok(GenesResponse { genes })
    }

    pub fn segments_for_genes(&self, structure: StructureId, genes: &str) -> Result<SegmentsResponse> {
        let segments = self.resolver().segments_for_genes(structure, genes)?;
        Ok(SegmentsResponse { segments })
    }

    pub fn structure_segments(&self, structure: StructureId) -> Result<SegmentRecordsResponse> {
        Ok(SegmentRecordsResponse {
            segments: self.repo.segments_of(structure)?,
        })
    }

    pub fn segment_ids(&self, structure: StructureId) -> Result<SegmentIdsResponse> {
        let segmentids = self
            .repo
            .segments_of(structure)?
            .iter()
            .map(|s| s.segid)
            .collect();
        Ok(SegmentIdsResponse { segmentids })
    }

    pub fn unmapped(&self, structure: StructureId) -> Result<UnmappedResponse> {
        Ok(UnmappedResponse {
            unmapped: unmapped_mask(self.repo, structure)?,
        })
    }

    pub fn contacts(&self, map: i64) -> Result<ContactsResponse> {
        Ok(ContactsResponse {
            contacts: self.repo.contacts(map)?,
        })
    }

    pub fn arrays(&self, kind: &str) -> Result<ArraysResponse> {
        Ok(ArraysResponse {
            arrays: self.repo.arrays_of_type(kind)?,
        })
    }

    pub fn array(&self, id: ArrayId, slice: usize) -> Result<ArrayResponse> {
        let view = fetch_array(self.repo, id, slice)?;
        let array = view.array;
        Ok(ArrayResponse {
            name: array.name,
            kind: array.kind,
            version: array.version,
            tags: array.tags,
            data: ArrayDataResponse {
                data_type: array.data.data_type,
                dim: array.data.dim,
                min: array.data.min,
                max: array.data.max,
                values: view.values,
            },
        })
    }

    pub fn sample_array(
        &self,
        id: ArrayId,
        slice: usize,
        begin: Position,
        end: Position,
        num_samples: usize,
    ) -> Result<DataResponse> {
        let data = sample_array(
            self.repo,
            self.sampler,
            &self.project,
            id,
            slice,
            begin,
            end,
            num_samples,
        )?;
        Ok(DataResponse { data })
    }
}
