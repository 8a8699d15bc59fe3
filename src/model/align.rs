use crate::engine::classify::{classify, classify_word, explanation};
use crate::engine::personal::PersonalDictionary;
use crate::engine::symspell::damerau_levenshtein;
use crate::engine::tokenizer::{strip_punctuation, whitespace_tokens, Token};
use crate::{Correction, ErrorType, Source};

/// Word pairs scoring below this are unrelated rewrites, not corrections of
/// the original word. The same floor applies on both alignment paths.
pub const SIMILARITY_FLOOR: f32 = 0.3;

const INSERTION_CONFIDENCE: f32 = 0.75;
const SPAN_CONFIDENCE: f32 = 0.7;

/// Reconcile a chunk's original text with the model's rewrite, producing
/// corrections anchored in the original document (`offset` is the chunk's
/// starting byte offset).
///
/// Equal word counts take a cheap positional pass; unequal counts mean the
/// model inserted or deleted words, which needs a real LCS alignment.
pub fn align_chunk(
    original: &str,
    rewritten: &str,
    offset: usize,
    personal: &dyn PersonalDictionary,
) -> Vec<Correction> {
    let orig_tokens = whitespace_tokens(original);
    let new_tokens = whitespace_tokens(rewritten);

    if orig_tokens.is_empty() || new_tokens.is_empty() {
        return Vec::new();
    }

    if orig_tokens.len() == new_tokens.len() {
        align_positional(&orig_tokens, &new_tokens, offset, personal)
    } else {
        align_lcs(original, &orig_tokens, &new_tokens, offset, personal)
    }
}

/// Fast path: same word count, compare pairwise by position.
fn align_positional(
    orig: &[Token],
    new: &[Token],
    offset: usize,
    personal: &dyn PersonalDictionary,
) -> Vec<Correction> {
    let mut corrections = Vec::new();

    for (o, n) in orig.iter().zip(new) {
        if o.text == n.text {
            continue;
        }
        let (o_core, core_start, core_end) = strip_punctuation(o.text);
        let (n_core, _, _) = strip_punctuation(n.text);
        if o_core.is_empty() || n_core.is_empty() {
            continue;
        }
        let o_lower = o_core.to_lowercase();
        let n_lower = n_core.to_lowercase();
        if o_lower == n_lower || personal.contains(o_core) {
            continue;
        }

        let score = similarity(&o_lower, &n_lower);
        if score < SIMILARITY_FLOOR {
            continue;
        }

        let kind = classify_word(o_core, n_core);
        corrections.push(Correction {
            original: o_core.to_string(),
            suggested: n_core.to_string(),
            kind,
            start: offset + o.start + core_start,
            end: offset + o.start + core_end,
            confidence: score,
            explanation: Some(explanation(kind).to_string()),
            source: Source::Model,
        });
    }

    corrections
}

/// General path: align word sequences of different lengths with an LCS and
/// walk the resulting operations, grouping consecutive edits into spans.
fn align_lcs(
    chunk: &str,
    orig: &[Token],
    new: &[Token],
    offset: usize,
    personal: &dyn PersonalDictionary,
) -> Vec<Correction> {
    let a_norm: Vec<String> = orig.iter().map(|t| t.text.to_lowercase()).collect();
    let b_norm: Vec<String> = new.iter().map(|t| t.text.to_lowercase()).collect();
    let ops = lcs_ops(&a_norm, &b_norm);

    let mut corrections = Vec::new();
    let mut deleted: Vec<usize> = Vec::new();
    let mut inserted: Vec<usize> = Vec::new();
    // Byte end (chunk-relative) of the last matched original word; pure
    // insertions anchor there.
    let mut last_match_end: Option<usize> = None;

    let flush =
        |deleted: &mut Vec<usize>, inserted: &mut Vec<usize>, last_match_end: &Option<usize>| {
            if deleted.is_empty() && inserted.is_empty() {
                return None;
            }
            let correction = build_group(
                chunk,
                orig,
                new,
                deleted,
                inserted,
                *last_match_end,
                offset,
                personal,
            );
            deleted.clear();
            inserted.clear();
            correction
        };

    for op in &ops {
        match *op {
            AlignOp::Match { a, .. } => {
                corrections.extend(flush(&mut deleted, &mut inserted, &last_match_end));
                last_match_end = Some(orig[a].end);
            }
            AlignOp::Delete { a } => deleted.push(a),
            AlignOp::Insert { b } => inserted.push(b),
        }
    }
    corrections.extend(flush(&mut deleted, &mut inserted, &last_match_end));

    corrections
}

/// Turn one grouped run of non-match operations into a correction, or None
/// when the group is rejected.
#[allow(clippy::too_many_arguments)]
fn build_group(
    chunk: &str,
    orig: &[Token],
    new: &[Token],
    deleted: &[usize],
    inserted: &[usize],
    last_match_end: Option<usize>,
    offset: usize,
    personal: &dyn PersonalDictionary,
) -> Option<Correction> {
    let suggested: String = inserted
        .iter()
        .map(|&b| new[b].text)
        .collect::<Vec<_>>()
        .join(" ");

    if deleted.is_empty() {
        // Pure insertion, e.g. a dropped "to" or article being restored.
        let anchor = last_match_end.unwrap_or_else(|| orig.first().map(|t| t.start).unwrap_or(0));
        let kind = classify("", &suggested);
        return Some(Correction {
            original: String::new(),
            suggested,
            kind,
            start: offset + anchor,
            end: offset + anchor,
            confidence: INSERTION_CONFIDENCE,
            explanation: Some(explanation(kind).to_string()),
            source: Source::Model,
        });
    }

    let span_start = orig[*deleted.first().unwrap()].start;
    let span_end = orig[*deleted.last().unwrap()].end;
    // Slice the chunk so inner whitespace (and any matched words the span
    // happens to bridge) is preserved verbatim.
    let original_text = chunk[span_start..span_end].to_string();

    if deleted.len() == 1 && inserted.len() == 1 {
        let (o_core, _, _) = strip_punctuation(orig[deleted[0]].text);
        let (n_core, _, _) = strip_punctuation(new[inserted[0]].text);
        if !o_core.is_empty() && personal.contains(o_core) {
            return None;
        }
        let o_lower = o_core.to_lowercase();
        let n_lower = n_core.to_lowercase();

        // Identical cores with different punctuation is a sentence-break
        // change, not a word change.
        let kind = if o_lower == n_lower {
            ErrorType::RunOn
        } else {
            let score = similarity(&o_lower, &n_lower);
            if score < SIMILARITY_FLOOR {
                return None;
            }
            classify_word(o_core, n_core)
        };
        let confidence = if kind == ErrorType::RunOn {
            SPAN_CONFIDENCE
        } else {
            similarity(&o_lower, &n_lower)
        };

        return Some(Correction {
            original: original_text,
            suggested,
            kind,
            start: offset + span_start,
            end: offset + span_end,
            confidence,
            explanation: Some(explanation(kind).to_string()),
            source: Source::Model,
        });
    }

    let kind = classify(&original_text, &suggested);
    Some(Correction {
        original: original_text,
        suggested,
        kind,
        start: offset + span_start,
        end: offset + span_end,
        confidence: SPAN_CONFIDENCE,
        explanation: Some(explanation(kind).to_string()),
        source: Source::Model,
    })
}

/// Normalized edit-distance similarity in [0, 1].
pub fn similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = damerau_levenshtein(a, b, max_len).unwrap_or(max_len);
    1.0 - distance as f32 / max_len as f32
}

/// One step of an LCS alignment between two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignOp {
    Match { a: usize, b: usize },
    Delete { a: usize },
    Insert { b: usize },
}

/// Longest-common-subsequence alignment of `a` and `b` as an immutable
/// operation sequence in left-to-right order. Pure function over the inputs,
/// so it can be tested in isolation.
pub fn lcs_ops<T: PartialEq>(a: &[T], b: &[T]) -> Vec<AlignOp> {
    let (m, n) = (a.len(), b.len());
    let width = n + 1;
    let mut dp = vec![0usize; (m + 1) * width];

    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if a[i - 1] == b[j - 1] {
                dp[(i - 1) * width + j - 1] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + j - 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(m.max(n));
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            ops.push(AlignOp::Match { a: i - 1, b: j - 1 });
            i -= 1;
            j -= 1;
        } else if dp[(i - 1) * width + j] >= dp[i * width + j - 1] {
            ops.push(AlignOp::Delete { a: i - 1 });
            i -= 1;
        } else {
            ops.push(AlignOp::Insert { b: j - 1 });
            j -= 1;
        }
    }
    while i > 0 {
        ops.push(AlignOp::Delete { a: i - 1 });
        i -= 1;
    }
    while j > 0 {
        ops.push(AlignOp::Insert { b: j - 1 });
        j -= 1;
    }

    ops.reverse();
    ops
}
