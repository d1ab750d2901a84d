//! Array slicing and sampling
//!
//! Inline arrays are stored one value per segment (or per fixed sampling
//! bin), so a genomic range maps straight onto an index range. Dense
//! sequence tracks are summarized by an external [`RangeSampler`].

use crate::core::error::{Entity, GentkError, Result, SamplerError};
use crate::core::model::{Array, ArrayId, ArraySource, DatasetInterval, Position, TrackLocator};
use crate::core::repository::{Repository, SliceSelector};
use std::ops::Range;

/// Downsampling request for a dense track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    /// Resource path, as stored in the array's locator
    pub resource: String,
    /// Chromosome or track id inside the resource
    pub track: String,
    pub begin: Position,
    pub end: Position,
    pub num_samples: usize,
}

impl SampleRequest {
    pub fn new(locator: &TrackLocator, begin: Position, end: Position, num_samples: usize) -> Self {
        Self {
            resource: locator.url.clone(),
            track: locator.chrom.clone(),
            begin,
            end,
            num_samples,
        }
    }
}

/// Upper bound on the bin count of one sampling request
pub const MAX_SAMPLES: usize = 100_000;

/// Reject bin counts above [`MAX_SAMPLES`]
pub fn check_sample_count(num_samples: usize) -> std::result::Result<(), SamplerError> {
    if num_samples > MAX_SAMPLES {
        return Err(SamplerError::TooManySamples {
            requested: num_samples,
            max: MAX_SAMPLES,
        });
    }
    Ok(())
}

/// External service summarizing a dense track over `[begin, end)` into
/// `num_samples` bins
pub trait RangeSampler: Send + Sync {
    fn sample(&self, request: &SampleRequest) -> std::result::Result<Vec<Option<f64>>, SamplerError>;
}

/// Sampler used when no dense-track backend is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSampler;

impl RangeSampler for NoSampler {
    fn sample(&self, request: &SampleRequest) -> std::result::Result<Vec<Option<f64>>, SamplerError> {
        Err(SamplerError::Unsupported(request.resource.clone()))
    }
}

/// Index range `[floor(begin/interval), floor(end/interval) + 1)` covering
/// the genomic range `[begin, end)`
///
/// # Examples
/// ```
/// use gentk_query::core::{slice_indices, DatasetInterval};
/// let interval = DatasetInterval::new(400_000).unwrap();
/// assert_eq!(slice_indices(0, 200_000, interval), 0..1);
/// ```
pub fn slice_indices(begin: Position, end: Position, interval: DatasetInterval) -> Range<usize> {
    let to_index = |bin: u64| usize::try_from(bin).unwrap_or(usize::MAX);
    let start = to_index(interval.bin_of(begin));
    let stop = to_index(interval.bin_of(end).saturating_add(1));
    start..stop.max(start)
}

/// Replace NaN sentinels with explicit missing markers
pub fn normalize_missing(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect()
}

/// Values of one array slice over a genomic range
///
/// Inline slices return the covered sub-sequence verbatim (NaN becomes
/// `None`). Dense-track slices are delegated to `sampler` and its result is
/// returned unmodified. `num_samples` above [`MAX_SAMPLES`] is rejected
/// for either kind of slice.
#[allow(clippy::too_many_arguments)]
pub fn sample_array<R, S>(
    repo: &R,
    sampler: &S,
    project: &str,
    array_id: ArrayId,
    slice: usize,
    begin: Position,
    end: Position,
    num_samples: usize,
) -> Result<Vec<Option<f64>>>
where
    R: Repository + ?Sized,
    S: RangeSampler + ?Sized,
{
    check_sample_count(num_samples)?;
    let array = repo.array_metadata(array_id)?;
    match slice_source(&array, slice)? {
        ArraySource::Sequence(locator) => {
            log::debug!(
                "sampling track {}:{} [{}, {}) into {} bins",
                locator.url,
                locator.chrom,
                begin,
                end,
                num_samples
            );
            let request = SampleRequest::new(locator, begin, end, num_samples);
            Ok(sampler.sample(&request)?)
        }
        ArraySource::Values(_) => {
            let interval = repo.dataset_interval(project)?;
            let indices = slice_indices(begin, end, interval);
            log::debug!("slicing array {} slice {} at {:?}", array_id, slice, indices);
            let values = repo.array_values(array_id, &SliceSelector::range(slice, indices))?;
            Ok(normalize_missing(values))
        }
    }
}

/// An array with one slice resolved to its values
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySliceView {
    pub array: Array,
    /// Values of the requested slice; empty for dense tracks
    pub values: Vec<Option<f64>>,
    /// Locator of the requested slice when it is a dense track
    pub track: Option<TrackLocator>,
}

/// Direct fetch of an array and one whole slice. Unknown arrays and slices
/// are reported as `NotFound`.
pub fn fetch_array<R: Repository + ?Sized>(repo: &R, array_id: ArrayId, slice: usize) -> Result<ArraySliceView> {
    let array = repo.array_metadata(array_id)?;
    let (values, track) = match slice_source(&array, slice)? {
        ArraySource::Sequence(locator) => (Vec::new(), Some(locator.clone())),
        ArraySource::Values(_) => {
            let values = repo.array_values(array_id, &SliceSelector::whole(slice))?;
            (normalize_missing(values), None)
        }
    };
    Ok(ArraySliceView { array, values, track })
}

fn slice_source(array: &Array, slice: usize) -> Result<&ArraySource> {
    array.slice(slice).ok_or(GentkError::NotFound(Entity::ArraySlice {
        array: array.id,
        slice,
    }))
}
