//! Unmapped-segment bitmap codec
//!
//! Per-structure metadata stores the unmapped segments compactly as a list
//! of 1-based inclusive ordinal pairs, e.g. `[[3,5],[10,10]]`. Clients get
//! the expanded mask: one entry per segment, `1` = unmapped, `0` = mapped.

use crate::core::error::{DecodeError, Result};
use crate::core::model::StructureId;
use crate::core::repository::Repository;

/// Expand a compact range list into a mask of `num_segments` entries.
///
/// Mask index `i` holds segment ordinal `i + 1`. Ordinals outside
/// `1..=num_segments` are ignored, and an inverted pair marks nothing.
///
/// # Examples
/// ```
/// use gentk_query::core::decode_unmapped;
/// let mask = decode_unmapped(6, "[[2,3], [6,6]]").unwrap();
/// assert_eq!(mask, vec![0, 1, 1, 0, 0, 1]);
/// ```
pub fn decode_unmapped(num_segments: usize, encoded: &str) -> std::result::Result<Vec<u8>, DecodeError> {
    let pairs: Vec<(u64, u64)> =
        serde_json::from_str(encoded).map_err(|e| DecodeError::InvalidEncoding {
            encoded: encoded.to_string(),
            message: e.to_string(),
        })?;

    let mut mask = vec![0u8; num_segments];
    let last = num_segments as u64;
    for (start, end) in pairs {
        let lo = start.max(1);
        let hi = end.min(last);
        if lo > hi {
            continue;
        }
        for flag in &mut mask[(lo - 1) as usize..hi as usize] {
            *flag = 1;
        }
    }

    Ok(mask)
}

/// Compress a mask into its compact form: one `[start,end]` pair per
/// maximal run of unmapped segments, 1-based and inclusive.
///
/// # Examples
/// ```
/// use gentk_query::core::encode_unmapped;
/// assert_eq!(encode_unmapped(&[0, 1, 1, 0, 0, 1]), "[[2,3],[6,6]]");
/// assert_eq!(encode_unmapped(&[0, 0]), "[]");
/// ```
pub fn encode_unmapped(mask: &[u8]) -> String {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for (i, &flag) in mask.iter().enumerate() {
        if flag == 0 {
            continue;
        }
        let ordinal = i + 1;
        match runs.last_mut() {
            Some((_, end)) if *end + 1 == ordinal => *end = ordinal,
            _ => runs.push((ordinal, ordinal)),
        }
    }

    let body: Vec<String> = runs
        .iter()
        .map(|(start, end)| format!("[{},{}]", start, end))
        .collect();
    format!("[{}]", body.join(","))
}

/// Unmapped mask of a structure, decoded from its stored metadata.
/// A structure without a metadata row is reported as `NotFound`.
pub fn unmapped_mask<R: Repository + ?Sized>(repo: &R, structure: StructureId) -> Result<Vec<u8>> {
    let metadata = repo.unmapped_metadata(structure)?;
    log::debug!(
        "decoding unmapped ranges of structure {} ({} segments)",
        structure,
        metadata.num_segments
    );
    Ok(decode_unmapped(metadata.num_segments, &metadata.ranges)?)
}
