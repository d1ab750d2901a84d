//! Interval overlap matcher
//!
//! Uses rust-lapper for O(log n + k) candidate lookup, then applies the
//! exact overlap predicate selected by [`OverlapMode`].

use crate::core::model::{Gene, Position, Segment, SegmentId, Span};
use rust_lapper::{Interval, Lapper};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Overlap predicate used to match a candidate span `[a, b]` against a
/// query span `[qs, qe]`. `between` is inclusive and false when `qs > qe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMode {
    /// `a` in query, or `b` in query, or candidate spans the whole query
    #[default]
    Spanning,
    /// `Spanning`, plus exact equality of either endpoint
    /// (`a == qs` or `b == qe`); used by location lookups
    SpanningInclusive,
    /// `Spanning`, plus the query strictly containing the candidate;
    /// used when resolving the segments of a gene
    Bidirectional,
}

impl OverlapMode {
    /// Evaluate the predicate for candidate `[a, b]` and query `[qs, qe]`
    ///
    /// # Examples
    /// ```
    /// use gentk_query::core::OverlapMode;
    /// assert!(OverlapMode::Spanning.matches(5, 20, 10, 15));
    /// assert!(!OverlapMode::Spanning.matches(1, 4, 10, 15));
    /// ```
    pub fn matches(&self, a: Position, b: Position, qs: Position, qe: Position) -> bool {
        let between = |x: Position| qs <= x && x <= qe;
        let spanning = between(a) || between(b) || (a < qs && b > qe);

        match self {
            OverlapMode::Spanning => spanning,
            OverlapMode::SpanningInclusive => spanning || a == qs || b == qe,
            OverlapMode::Bidirectional => spanning || (a > qs && b < qe),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapMode::Spanning => "spanning",
            OverlapMode::SpanningInclusive => "spanning-inclusive",
            OverlapMode::Bidirectional => "bidirectional",
        }
    }
}

impl FromStr for OverlapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spanning" => Ok(OverlapMode::Spanning),
            "spanning-inclusive" | "inclusive" => Ok(OverlapMode::SpanningInclusive),
            "bidirectional" => Ok(OverlapMode::Bidirectional),
            other => Err(format!("unknown overlap mode '{}'", other)),
        }
    }
}

/// Anything the matcher can index: a span plus a natural ordering key
pub trait SpanEntry {
    type Key: Ord + Clone;

    fn span(&self) -> Span;
    fn key(&self) -> Self::Key;
}

impl SpanEntry for Segment {
    type Key = SegmentId;

    fn span(&self) -> Span {
        Segment::span(self)
    }

    fn key(&self) -> SegmentId {
        self.segid
    }
}

impl SpanEntry for Gene {
    type Key = String;

    fn span(&self) -> Span {
        Gene::span(self)
    }

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Candidate collection indexed for overlap queries
///
/// Candidates are stored as half-open lapper intervals `[a, b + 1)` that
/// point back into the owned entry list. Bounds are widened to `u128` so a
/// span ending at `u64::MAX` keeps its last position.
pub struct SpanIndex<T> {
    entries: Vec<T>,
    lapper: Lapper<u128, usize>,
}

impl<T: SpanEntry> SpanIndex<T> {
    /// Build the index over a candidate collection
    pub fn new(entries: Vec<T>) -> Self {
        let intervals = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let span = entry.span();
                let (lo, hi) = if span.is_inverted() {
                    (span.end, span.start)
                } else {
                    (span.start, span.end)
                };
                Interval {
                    start: u128::from(lo),
                    stop: u128::from(hi) + 1,
                    val: i,
                }
            })
            .collect();

        Self {
            entries,
            lapper: Lapper::new(intervals),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries overlapping `query` under `mode`, in no particular order
    pub fn find(&self, query: Span, mode: OverlapMode) -> Vec<&T> {
        let accept = |entry: &T| {
            let span = entry.span();
            mode.matches(span.start, span.end, query.start, query.end)
        };

        if query.is_inverted() {
            // Only the literal predicate can decide here; the lapper
            // prefilter assumes an ordered query.
            return self.entries.iter().filter(|e| accept(*e)).collect();
        }

        self.lapper
            .find(u128::from(query.start), u128::from(query.end) + 1)
            .map(|iv| &self.entries[iv.val])
            .filter(|e| accept(*e))
            .collect()
    }

    /// Keys of entries overlapping any of `queries`, de-duplicated and
    /// sorted by the natural key
    pub fn find_keys(&self, queries: &[Span], mode: OverlapMode) -> Vec<T::Key> {
        let keys: BTreeSet<T::Key> = queries
            .iter()
            .flat_map(|q| self.find(*q, mode))
            .map(|entry| entry.key())
            .collect();
        keys.into_iter().collect()
    }
}
