use crate::engine::personal::{normalize, PersonalDictionary};
use crate::Correction;

/// Combine correction streams from every producer into one ranked,
/// non-overlapping list.
///
/// `streams` must be given in priority order (model pipeline first, then the
/// dictionary pipeline, then external producers: contextual rules before
/// generic grammar rules; API streams are just another entry). The result is
/// ordered by start offset and guarantees the engine's output invariants:
/// no overlapping `[start, end)` ranges and no correction whose normalized
/// original is user-approved.
pub fn merge(streams: Vec<Vec<Correction>>, personal: &dyn PersonalDictionary) -> Vec<Correction> {
    let mut all: Vec<(usize, Correction)> = Vec::new();
    for (priority, stream) in streams.into_iter().enumerate() {
        for correction in stream {
            let normalized = normalize(&correction.original);
            if !normalized.is_empty() && personal.contains(&normalized) {
                continue;
            }
            all.push((priority, correction));
        }
    }

    all.sort_by(|(pa, a), (pb, b)| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.source.rank().cmp(&b.source.rank()))
            .then_with(|| b.span_len().cmp(&a.span_len()))
            .then_with(|| pa.cmp(pb))
    });

    let mut accepted: Vec<Correction> = Vec::new();
    for (_, candidate) in all {
        if accepted.iter().all(|kept| !overlaps(kept, &candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
    accepted
}

/// Range overlap over `[start, end)`. Pure insertions (empty ranges) collide
/// with each other at the same point and with any span they fall strictly
/// inside of, but may sit at a span's edge.
fn overlaps(a: &Correction, b: &Correction) -> bool {
    match (a.is_insertion(), b.is_insertion()) {
        (true, true) => a.start == b.start,
        (true, false) => b.start < a.start && a.start < b.end,
        (false, true) => a.start < b.start && b.start < a.end,
        (false, false) => a.start < b.end && b.start < a.end,
    }
}
