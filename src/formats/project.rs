//! Project snapshot loader
//!
//! A snapshot is one JSON document holding everything the engine reads
//! for a project: dataset interval, structures, genes, unmapped metadata,
//! arrays and contact maps. It may be gzip- or bzip2-compressed.
//!
//! ```json
//! {
//!   "id": "test00projid",
//!   "interval": 400000,
//!   "datasets": [0, 1],
//!   "structures": [{"id": 0, "segments": [{"segid": 1, "startid": 1, "endid": 400000, "length": 400000}]}],
//!   "genes": [{"gene_name": "Btbd35f23", "start": 3076875, "end": 3078817, "length": 1942}],
//!   "unmapped": [{"structure": 0, "num_segments": 11, "ranges": "[[3,5]]"}],
//!   "arrays": [{"id": 0, "name": "increasing int", "type": "structure", "data": {"values": [{"values": [1, 2]}]}}],
//!   "contacts": [{"map": 0, "contacts": [{"x": 5, "y": 8, "value": 1.228}]}]
//! }
//! ```

use crate::core::io::open_reader;
use crate::core::{
    Array, Contact, DatasetInterval, Gene, MemoryRepository, ProjectError, Structure, StructureId,
    UnmappedMetadata,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Unmapped metadata row of one structure
#[derive(Debug, Clone, Deserialize)]
pub struct UnmappedEntry {
    pub structure: StructureId,
    #[serde(flatten)]
    pub metadata: UnmappedMetadata,
}

/// Records of one contact map
#[derive(Debug, Clone, Deserialize)]
pub struct ContactMap {
    pub map: i64,
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

/// Deserialized project snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSnapshot {
    pub id: String,
    pub interval: u64,
    #[serde(default)]
    pub datasets: Vec<i64>,
    #[serde(default)]
    pub structures: Vec<Structure>,
    #[serde(default)]
    pub genes: Vec<Gene>,
    #[serde(default)]
    pub unmapped: Vec<UnmappedEntry>,
    #[serde(default)]
    pub arrays: Vec<Array>,
    #[serde(default)]
    pub contacts: Vec<ContactMap>,
}

impl ProjectSnapshot {
    /// Build the in-memory repository. Arrays are appended in order, so an
    /// array's id is its position in the snapshot.
    pub fn into_repository(self) -> Result<MemoryRepository, ProjectError> {
        let interval =
            DatasetInterval::new(self.interval).ok_or(ProjectError::InvalidInterval(self.interval))?;

        let mut repo = MemoryRepository::new(self.id, interval);
        if !self.datasets.is_empty() {
            repo.set_datasets(self.datasets);
        }
        for structure in self.structures {
            repo.insert_structure(structure);
        }
        for gene in self.genes {
            repo.insert_gene(gene);
        }
        for entry in self.unmapped {
            repo.insert_unmapped(entry.structure, entry.metadata);
        }
        for array in self.arrays {
            let declared = array.id;
            let assigned = repo.insert_array(array);
            if declared != assigned {
                log::warn!("array declared as id {} stored as id {}", declared, assigned);
            }
        }
        for map in self.contacts {
            repo.insert_contacts(map.map, map.contacts);
        }

        Ok(repo)
    }
}

/// Load a project snapshot file (plain, .gz or .bz2)
pub fn load_project<P: AsRef<Path>>(path: P) -> Result<MemoryRepository, ProjectError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProjectError::FileNotFound(path.to_path_buf()));
    }
    parse_project_reader(open_reader(path)?)
}

/// Parse a snapshot from any reader
pub fn parse_project_reader<R: Read>(reader: R) -> Result<MemoryRepository, ProjectError> {
    let snapshot: ProjectSnapshot = serde_json::from_reader(reader)?;
    log::debug!(
        "project {}: {} structures, {} genes, {} arrays",
        snapshot.id,
        snapshot.structures.len(),
        snapshot.genes.len(),
        snapshot.arrays.len()
    );
    snapshot.into_repository()
}

/// Parse a snapshot from bytes (for testing)
pub fn parse_project_bytes(data: &[u8]) -> Result<MemoryRepository, ProjectError> {
    parse_project_reader(data)
}
