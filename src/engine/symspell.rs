use super::cache::BoundedCache;
use super::dictionary::FrequencyDictionary;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Maximum true edit distance for a suggestion to be offered.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Words longer than this are not indexed; their deletion-variant fan-out is
/// too large and misspellings of them are better served by the phonetic tier.
const MAX_INDEXED_WORD_LEN: usize = 15;

const CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub word: String,
    pub distance: usize,
    pub frequency: u64,
}

/// Deletion-variant index answering "nearest known word within edit
/// distance 2".
///
/// Every sufficiently frequent dictionary word is indexed under all strings
/// reachable by deleting up to two of its characters. Correcting an unknown
/// word then reduces to generating the input's own deletion variants and
/// intersecting, with a capped Damerau–Levenshtein pass to verify the true
/// distance of each candidate.
pub struct SymSpellIndex {
    variants: HashMap<String, Vec<u32>>,
    words: Vec<(String, u64)>,
    cache: Mutex<BoundedCache<String, Option<Suggestion>>>,
}

impl SymSpellIndex {
    pub fn build(dict: &FrequencyDictionary) -> Self {
        let mut variants: HashMap<String, Vec<u32>> = HashMap::new();
        let mut words = Vec::new();

        for entry in dict.suggestion_entries() {
            if entry.word.chars().count() > MAX_INDEXED_WORD_LEN {
                continue;
            }
            let id = words.len() as u32;
            words.push((entry.word.clone(), entry.frequency));

            for variant in deletion_variants(&entry.word, MAX_EDIT_DISTANCE) {
                variants.entry(variant).or_default().push(id);
            }
        }

        Self {
            variants,
            words,
            cache: Mutex::new(BoundedCache::new(CACHE_CAPACITY)),
        }
    }

    /// Best dictionary word within edit distance 2 of `word`, smallest
    /// distance first, ties broken by frequency. None when the input is
    /// already known or nothing verifies within the cap.
    pub fn correct(&self, word: &str, dict: &FrequencyDictionary) -> Option<Suggestion> {
        let lower = word.to_lowercase();

        if lower.is_empty() || dict.is_known(&lower) {
            return None;
        }

        if let Some(cached) = self.cache.lock().unwrap().get(&lower) {
            return cached.clone();
        }

        let mut candidate_ids: HashSet<u32> = HashSet::new();
        for variant in deletion_variants(&lower, MAX_EDIT_DISTANCE) {
            if let Some(ids) = self.variants.get(&variant) {
                candidate_ids.extend(ids);
            }
        }

        let mut best: Option<Suggestion> = None;
        for id in candidate_ids {
            let (candidate, frequency) = &self.words[id as usize];
            // Index hits are only candidates; verify the true distance.
            let Some(distance) = damerau_levenshtein(&lower, candidate, MAX_EDIT_DISTANCE) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(b) => {
                    distance < b.distance || (distance == b.distance && *frequency > b.frequency)
                }
            };
            if better {
                best = Some(Suggestion {
                    word: candidate.clone(),
                    distance,
                    frequency: *frequency,
                });
            }
        }

        self.cache.lock().unwrap().insert(lower, best.clone());
        best
    }

    pub fn indexed_words(&self) -> usize {
        self.words.len()
    }
}

/// All strings reachable from `word` by deleting up to `max_deletes`
/// characters, the word itself included.
pub fn deletion_variants(word: &str, max_deletes: usize) -> HashSet<String> {
    let mut variants = HashSet::new();
    variants.insert(word.to_string());

    let mut frontier = vec![word.to_string()];
    for _ in 0..max_deletes {
        let mut next = Vec::new();
        for current in &frontier {
            let chars: Vec<char> = current.chars().collect();
            for skip in 0..chars.len() {
                let shorter: String = chars
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, c)| c)
                    .collect();
                if variants.insert(shorter.clone()) {
                    next.push(shorter);
                }
            }
        }
        frontier = next;
    }

    variants
}

/// Damerau–Levenshtein distance (insert/delete/substitute/adjacent
/// transpose) capped at `max`. Returns None as soon as the distance is known
/// to exceed the cap.
///
/// Runs over a single flat matrix; after each row, if every cell already
/// exceeds the cap the whole computation is aborted, which bounds the cost
/// per candidate even for long inputs.
pub fn damerau_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    if m.abs_diff(n) > max {
        return None;
    }
    if m == 0 {
        return (n <= max).then_some(n);
    }
    if n == 0 {
        return (m <= max).then_some(m);
    }

    let width = n + 1;
    let mut d = vec![0usize; (m + 1) * width];
    for j in 0..=n {
        d[j] = j;
    }

    for i in 1..=m {
        d[i * width] = i;
        let mut row_min = i;

        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut cell = (d[(i - 1) * width + j] + 1)
                .min(d[i * width + j - 1] + 1)
                .min(d[(i - 1) * width + j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                cell = cell.min(d[(i - 2) * width + j - 2] + 1);
            }

            d[i * width + j] = cell;
            row_min = row_min.min(cell);
        }

        if row_min > max {
            return None;
        }
    }

    let distance = d[m * width + n];
    (distance <= max).then_some(distance)
}
