//! Result ordering.
//!
//! The same query always yields the same order, whatever order the
//! upstream service returned its routes in.

use std::cmp::Ordering;

use crate::domain::ResolvedSegment;

/// Sort results best-first.
///
/// Results are ranked by:
/// 1. State equal to `preferred_uf` first
/// 2. Road equal to `preferred_br` first
/// 3. Identified segments before unresolved ones
/// 4. Segment id
/// 5. State, then road, then segment type
///
/// Preferences are compared exactly; a `None` preference ranks nothing
/// first. The sort is stable.
pub fn rank_results(
    mut results: Vec<ResolvedSegment>,
    preferred_uf: Option<&str>,
    preferred_br: Option<&str>,
) -> Vec<ResolvedSegment> {
    results.sort_by(|a, b| compare(a, b, preferred_uf, preferred_br));
    results
}

fn compare(
    a: &ResolvedSegment,
    b: &ResolvedSegment,
    preferred_uf: Option<&str>,
    preferred_br: Option<&str>,
) -> Ordering {
    // `false` sorts before `true`, so "is not preferred" puts matches first
    let not_preferred = |value: &str, preferred: Option<&str>| preferred != Some(value);

    not_preferred(&a.uf, preferred_uf)
        .cmp(&not_preferred(&b.uf, preferred_uf))
        .then_with(|| not_preferred(&a.br, preferred_br).cmp(&not_preferred(&b.br, preferred_br)))
        .then_with(|| a.segment_id.is_none().cmp(&b.segment_id.is_none()))
        .then_with(|| a.segment_id.cmp(&b.segment_id))
        .then_with(|| a.uf.cmp(&b.uf))
        .then_with(|| a.br.cmp(&b.br))
        .then_with(|| a.segment_type.cmp(&b.segment_type))
}
