//! Property-based tests for array slicing and track downsampling

use gentk_query::core::{
    sample_array, slice_indices, DatasetInterval, GentkError, MemoryRepository, NewArray,
    NoSampler, SamplerError, MAX_SAMPLES,
};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn arb_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.9, -1_000.0f64..1_000.0), 0..64)
}

fn repository_with(interval: u64, values: Vec<Option<f64>>) -> MemoryRepository {
    let repo = MemoryRepository::new("p", DatasetInterval::new(interval).unwrap());
    repo.append_array(NewArray {
        name: "values".to_string(),
        kind: "structure".to_string(),
        tags: vec![],
        data_type: Some("float".to_string()),
        dim: Some(1),
        values,
    })
    .unwrap();
    repo
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The index range covers both endpoints' bins
    #[test]
    fn prop_slice_covers_endpoints(
        interval in 1u64..1_000_000,
        begin in 0u64..100_000_000,
        len in 0u64..10_000_000,
    ) {
        let end = begin + len;
        let width = DatasetInterval::new(interval).unwrap();
        let range = slice_indices(begin, end, width);

        prop_assert_eq!(range.start as u64, begin / interval);
        prop_assert_eq!(range.end as u64, end / interval + 1);
        prop_assert!(!range.is_empty());
    }

    /// An inverted range selects at most the bin of `begin`
    #[test]
    fn prop_inverted_range_is_small(interval in 1u64..1_000, begin in 1u64..1_000_000, back in 1u64..2_000) {
        let width = DatasetInterval::new(interval).unwrap();
        let range = slice_indices(begin, begin - back.min(begin), width);
        prop_assert!(range.len() <= 1);
        prop_assert_eq!(range.start as u64, begin / interval);
    }

    /// Inline sampling returns the stored sub-sequence, clamped to its length
    #[test]
    fn prop_inline_sample_is_subslice(
        values in arb_values(),
        interval in 1u64..1_000,
        begin in 0u64..80_000,
        len in 0u64..80_000,
        samples in 0usize..500,
    ) {
        let end = begin + len;
        let repo = repository_with(interval, values.clone());
        let data = sample_array(&repo, &NoSampler, "p", 0, 0, begin, end, samples).unwrap();

        let start = ((begin / interval) as usize).min(values.len());
        let stop = ((end / interval + 1) as usize).clamp(start, values.len());
        prop_assert_eq!(data, values[start..stop].to_vec());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_half_segment_selects_one_value() {
    let values: Vec<Option<f64>> = (1..=11).map(|v| Some(v as f64)).collect();
    let repo = repository_with(400_000, values);
    let data = sample_array(&repo, &NoSampler, "p", 0, 0, 0, 200_000, 100).unwrap();
    assert_eq!(data, vec![Some(1.0)]);
}

#[test]
fn test_sample_count_ignored_for_inline_arrays() {
    let values: Vec<Option<f64>> = (1..=11).map(|v| Some(v as f64)).collect();
    let repo = repository_with(400_000, values);
    let few = sample_array(&repo, &NoSampler, "p", 0, 0, 0, 4_400_000, 1).unwrap();
    let many = sample_array(&repo, &NoSampler, "p", 0, 0, 0, 4_400_000, 1_000).unwrap();
    assert_eq!(few, many);
    assert_eq!(few.len(), 11);
}

#[test]
fn test_oversized_sample_count_is_caller_error() {
    let repo = repository_with(400_000, vec![Some(1.0); 11]);
    for samples in [MAX_SAMPLES + 1, usize::MAX] {
        let err = sample_array(&repo, &NoSampler, "p", 0, 0, 10, 10, samples).unwrap_err();
        assert!(matches!(
            err,
            GentkError::Sampler(SamplerError::TooManySamples { max: MAX_SAMPLES, .. })
        ));
        assert!(err.is_caller_error());
    }
}

// ============================================================================
// BigWig Binning
// ============================================================================

#[cfg(feature = "bigwig")]
mod bigwig {
    use gentk_query::formats::bin_means;
    use proptest::prelude::*;

    /// Sorted, non-overlapping `(start, end, value)` intervals
    fn arb_intervals() -> impl Strategy<Value = Vec<(u64, u64, f64)>> {
        prop::collection::vec((0u64..200, 1u64..200, 0.0f64..100.0), 0..30).prop_map(|raw| {
            let mut pos = 0u64;
            raw.into_iter()
                .map(|(gap, len, value)| {
                    let start = pos + gap;
                    pos = start + len;
                    (start, pos, value)
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Always exactly one entry per bin
        #[test]
        fn prop_one_entry_per_bin(
            intervals in arb_intervals(),
            begin in 0u64..5_000,
            len in 0u64..5_000,
            bins in 0usize..300,
        ) {
            prop_assert_eq!(bin_means(&intervals, begin, begin + len, bins).unwrap().len(), bins);
        }

        /// Each mean lies within the values of the intervals it averages
        #[test]
        fn prop_means_bounded(
            intervals in arb_intervals(),
            begin in 0u64..5_000,
            len in 1u64..5_000,
            bins in 1usize..300,
        ) {
            let lo = intervals.iter().map(|i| i.2).fold(f64::INFINITY, f64::min);
            let hi = intervals.iter().map(|i| i.2).fold(f64::NEG_INFINITY, f64::max);
            for mean in bin_means(&intervals, begin, begin + len, bins).unwrap().into_iter().flatten() {
                prop_assert!(mean >= lo - 1e-9 && mean <= hi + 1e-9, "{} outside [{}, {}]", mean, lo, hi);
            }
        }

        /// A constant track yields that constant in every non-empty bin
        #[test]
        fn prop_constant_track(value in -50.0f64..50.0, len in 1u64..5_000, bins in 1usize..100) {
            let means = bin_means(&[(0, len, value)], 0, len, bins).unwrap();
            for (i, mean) in means.iter().enumerate() {
                let lo = len as u128 * i as u128 / bins as u128;
                let hi = len as u128 * (i as u128 + 1) / bins as u128;
                if hi > lo {
                    let got = mean.unwrap();
                    prop_assert!((got - value).abs() < 1e-9);
                } else {
                    prop_assert!(mean.is_none());
                }
            }
        }
    }
}
