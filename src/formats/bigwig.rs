//! BigWig range-sampler
//!
//! Summarizes a dense BigWig track over `[begin, end)` into a fixed number
//! of equal-width bins. Each bin holds the coverage-weighted mean of the
//! intervals overlapping it, or `None` when no interval touches it.

use crate::core::{check_sample_count, RangeSampler, SampleRequest, SamplerError};
use bigtools::BigWigRead;
use std::path::{Path, PathBuf};

/// Range-sampler reading BigWig files below a project root
#[derive(Debug, Clone)]
pub struct BigWigSampler {
    root: PathBuf,
}

impl BigWigSampler {
    /// Resource locators are resolved relative to `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Read the `(start, end, value)` intervals of one chromosome that
    /// overlap `[begin, end)`. `end` is clamped to the chromosome length.
    fn read_intervals(
        &self,
        path: &Path,
        chrom: &str,
        begin: u64,
        end: u64,
    ) -> Result<Vec<(u64, u64, f64)>, SamplerError> {
        let open_error = |message: String| SamplerError::Open {
            path: path.to_path_buf(),
            message,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| open_error("path is not valid UTF-8".to_string()))?;
        let mut reader = BigWigRead::open_file(path_str).map_err(|e| open_error(e.to_string()))?;

        let chrom_len = reader
            .chroms()
            .iter()
            .find(|c| c.name == chrom)
            .map(|c| c.length as u64)
            .ok_or_else(|| SamplerError::UnknownTrack {
                path: path.to_path_buf(),
                track: chrom.to_string(),
            })?;

        let stop = end.min(chrom_len);
        if begin >= stop {
            return Ok(Vec::new());
        }

        let intervals = reader
            .get_interval(chrom, begin as u32, stop as u32)
            .map_err(|e| SamplerError::Read(e.to_string()))?;

        let mut values = Vec::new();
        for interval in intervals {
            let interval = interval.map_err(|e| SamplerError::Read(e.to_string()))?;
            values.push((interval.start as u64, interval.end as u64, interval.value as f64));
        }
        Ok(values)
    }
}

impl RangeSampler for BigWigSampler {
    fn sample(&self, request: &SampleRequest) -> Result<Vec<Option<f64>>, SamplerError> {
        check_sample_count(request.num_samples)?;
        if request.num_samples == 0 || request.begin >= request.end {
            return Ok(vec![None; request.num_samples]);
        }

        let path = self.root.join(&request.resource);
        let intervals = self.read_intervals(&path, &request.track, request.begin, request.end)?;
        log::debug!(
            "{}:{} [{}, {}) -> {} intervals",
            path.display(),
            request.track,
            request.begin,
            request.end,
            intervals.len()
        );

        bin_means(&intervals, request.begin, request.end, request.num_samples)
    }
}

/// Coverage-weighted mean of `intervals` in each of `bins` equal-width
/// bins over `[begin, end)`. Bin `i` covers
/// `[begin + w*i/bins, begin + w*(i+1)/bins)` with `w = end - begin`.
/// More than `MAX_SAMPLES` bins is an error.
pub fn bin_means(
    intervals: &[(u64, u64, f64)],
    begin: u64,
    end: u64,
    bins: usize,
) -> Result<Vec<Option<f64>>, SamplerError> {
    check_sample_count(bins)?;
    if bins == 0 {
        return Ok(Vec::new());
    }
    if begin >= end {
        return Ok(vec![None; bins]);
    }

    let width = (end - begin) as u128;
    let edges: Vec<u64> = (0..=bins)
        .map(|i| begin + (width * i as u128 / bins as u128) as u64)
        .collect();

    let mut sums = vec![0.0f64; bins];
    let mut covered = vec![0u64; bins];

    for &(start, stop, value) in intervals {
        let s = start.max(begin);
        let e = stop.min(end);
        if s >= e || value.is_nan() {
            continue;
        }

        let first = edges.partition_point(|&edge| edge <= s).saturating_sub(1);
        for bin in first..bins {
            let lo = edges[bin].max(s);
            let hi = edges[bin + 1].min(e);
            if edges[bin] >= e {
                break;
            }
            if hi > lo {
                let overlap = hi - lo;
                sums[bin] += value * overlap as f64;
                covered[bin] += overlap;
            }
        }
    }

    Ok(sums
        .into_iter()
        .zip(covered)
        .map(|(sum, bases)| (bases > 0).then(|| sum / bases as f64))
        .collect())
}
