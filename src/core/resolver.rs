//! Coordinate resolution
//!
//! Translates between linear locations, structure segments and genes:
//! 1. Normalize the query with the range expression parser
//! 2. Fetch candidate spans from the repository
//! 3. Match them with the overlap strategy for that direction
//! 4. Union the per-token hits, de-duplicated and sorted
//!
//! Unknown segments and genes inside a batch only log a warning and
//! contribute nothing. Parse errors and storage failures abort the query.

use crate::core::error::{Result, StorageError};
use crate::core::model::{Gene, Segment, SegmentId, Span, StructureId};
use crate::core::overlap::{OverlapMode, SpanIndex};
use crate::core::range::{parse_range_expression, split_name_list};
use crate::core::repository::Repository;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Overlap strategy for location -> gene lookups
pub const LOCATION_GENE_MODE: OverlapMode = OverlapMode::SpanningInclusive;

/// Overlap strategy for gene -> segment lookups
pub const GENE_SEGMENT_MODE: OverlapMode = OverlapMode::Bidirectional;

/// Resolves queries against a repository. Holds no state beyond the
/// borrowed repository, so one resolver can serve any number of threads.
pub struct CoordinateResolver<'a, R: Repository + ?Sized> {
    repo: &'a R,
}

impl<'a, R: Repository + ?Sized> CoordinateResolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Genes overlapping any of the locations in a range expression
    /// (e.g. `"2400000-2800000,3076875"`), sorted by name
    pub fn genes_for_locations(&self, locations: &str) -> Result<Vec<String>> {
        let spans = parse_range_expression(locations)?;
        self.genes_for_spans(&spans)
    }

    /// Genes overlapping any of `spans`, sorted by name. Inverted spans
    /// match nothing.
    pub fn genes_for_spans(&self, spans: &[Span]) -> Result<Vec<String>> {
        let queries: Vec<Span> = spans
            .iter()
            .copied()
            .filter(|span| {
                if span.is_inverted() {
                    log::debug!("ignoring inverted location range {}", span);
                }
                !span.is_inverted()
            })
            .collect();
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let index = SpanIndex::new(self.repo.genes()?);
        let names: BTreeSet<String> = queries
            .par_iter()
            .map(|query| {
                index
                    .find(*query, LOCATION_GENE_MODE)
                    .into_iter()
                    .map(|gene| gene.name.clone())
                    .collect::<Vec<_>>()
            })
            .flatten_iter()
            .collect();

        Ok(names.into_iter().collect())
    }

    /// Genes overlapping the segments named by a range expression
    /// (e.g. `"7,8-10"`) in one structure, sorted by name
    pub fn genes_for_segments(&self, structure: StructureId, segments: &str) -> Result<Vec<String>> {
        let tokens = parse_range_expression(segments)?;

        let mut spans = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Some(span) = self.segment_token_span(structure, token)? {
                spans.push(span);
            }
        }

        self.genes_for_spans(&spans)
    }

    /// Linear span covered by a segment token: a single segment's
    /// `[startid, endid]`, or for `a-b` the start of `a` to the end of `b`.
    /// `None` when a segment has no row.
    fn segment_token_span(&self, structure: StructureId, token: Span) -> Result<Option<Span>> {
        let first = match self.lookup_segment(structure, token.start)? {
            Some(segment) => segment,
            None => return Ok(None),
        };
        if token.start == token.end {
            return Ok(Some(first.span()));
        }

        let last = match self.lookup_segment(structure, token.end)? {
            Some(segment) => segment,
            None => return Ok(None),
        };
        Ok(Some(Span::new(first.startid, last.endid)))
    }

    fn lookup_segment(&self, structure: StructureId, segid: SegmentId) -> Result<Option<Segment>> {
        match self.repo.segment(structure, segid) {
            Ok(segment) => Ok(Some(segment)),
            Err(StorageError::NotFound(_)) => {
                log::warn!(
                    "segment {} not found in structure {}; contributes no genes",
                    segid,
                    structure
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Segments of a structure overlapping any of the named genes
    /// (comma-separated), sorted by segment id
    pub fn segments_for_genes(&self, structure: StructureId, names: &str) -> Result<Vec<SegmentId>> {
        let genes = self.lookup_genes(&split_name_list(names))?;
        if genes.is_empty() {
            return Ok(Vec::new());
        }

        let index = SpanIndex::new(self.repo.segments_of(structure)?);
        let spans: Vec<Span> = genes.iter().map(Gene::span).collect();
        Ok(index.find_keys(&spans, GENE_SEGMENT_MODE))
    }

    fn lookup_genes(&self, names: &[&str]) -> Result<Vec<Gene>> {
        let mut genes = Vec::with_capacity(names.len());
        for name in names {
            match self.repo.gene(name) {
                Ok(gene) => genes.push(gene),
                Err(StorageError::NotFound(_)) => {
                    log::warn!("gene '{}' not found; contributes no segments", name);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(genes)
    }
}
