//! Overlap detection and measurement between two lhss (spec.md §3, §4.2).

use crate::config::OverlapPolicy;
use fpsemi_base::Word;

/// An overlap of `lhs(r1)` with `lhs(r2)`: a nonempty suffix of `lhs(r1)`
/// that is also a prefix of `lhs(r2)`, excluding the "trivial" boundary
/// cases where one lhs is entirely contained in the other (those are
/// subsumptions, handled by inter-reduction, not critical pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// Length of the shared region `B`.
    pub len: usize,
}

/// Finds every genuine (non-trivial) overlap of `lhs1` with `lhs2`.
pub fn genuine_overlaps(lhs1: &Word, lhs2: &Word) -> Vec<Overlap> {
    lhs1.suffix_prefix_overlaps(lhs2)
        .into_iter()
        .filter(|&len| len < lhs1.len() && len < lhs2.len())
        .map(|len| Overlap { len })
        .collect()
}

/// Measures an overlap's length under the configured policy, for an overlap
/// of `AB` (= `lhs1`) with `BC` (= `lhs2`) sharing region `B` of length
/// `overlap.len` (spec.md §4.2 "Overlap length is measured under one of
/// three configurable policies").
pub fn measure(lhs1_len: usize, lhs2_len: usize, overlap: Overlap) -> impl Fn(OverlapPolicy) -> usize {
    move |policy| {
        let a_len = lhs1_len - overlap.len;
        let c_len = lhs2_len - overlap.len;
        match policy {
            OverlapPolicy::Abc => a_len + overlap.len + c_len,
            OverlapPolicy::AbBc => lhs1_len + lhs2_len,
            OverlapPolicy::MaxAbBc => lhs1_len.max(lhs2_len),
        }
    }
}
