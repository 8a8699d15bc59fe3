use super::cache::BoundedCache;
use super::dictionary::FrequencyDictionary;
use super::metaphone::double_metaphone;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Candidates whose length differs from the input by more than this are too
/// dissimilar to be the intended word, even if they sound alike.
const MAX_LENGTH_DIFF: usize = 3;

const CACHE_CAPACITY: usize = 1024;

/// Sound-alike fallback index: double-metaphone code -> candidate words.
///
/// A strictly softer signal than the SymSpell tier; consulted only after
/// edit-distance matching fails, for misspellings far from the intended word
/// in edit distance but close in pronunciation ("nessesary").
pub struct PhoneticIndex {
    codes: HashMap<String, Vec<u32>>,
    words: Vec<(String, u64)>,
    cache: Mutex<BoundedCache<String, Option<String>>>,
}

impl PhoneticIndex {
    pub fn build(dict: &FrequencyDictionary) -> Self {
        let mut codes: HashMap<String, Vec<u32>> = HashMap::new();
        let mut words = Vec::new();

        for entry in dict.suggestion_entries() {
            if entry.word.chars().count() < 2 {
                continue;
            }
            let id = words.len() as u32;
            words.push((entry.word.clone(), entry.frequency));

            let (primary, alternate) = double_metaphone(&entry.word);
            if primary.is_empty() {
                continue;
            }
            codes.entry(primary.clone()).or_default().push(id);
            if alternate != primary {
                codes.entry(alternate).or_default().push(id);
            }
        }

        Self {
            codes,
            words,
            cache: Mutex::new(BoundedCache::new(CACHE_CAPACITY)),
        }
    }

    /// Highest-frequency known word sharing a phonetic code with `word`,
    /// within the length window. None when the input is already known or
    /// nothing survives the filter.
    pub fn correct(&self, word: &str, dict: &FrequencyDictionary) -> Option<String> {
        let lower = word.to_lowercase();

        if lower.is_empty() || dict.is_known(&lower) {
            return None;
        }

        if let Some(cached) = self.cache.lock().unwrap().get(&lower) {
            return cached.clone();
        }

        let input_len = lower.chars().count();
        let (primary, alternate) = double_metaphone(&lower);

        let mut candidate_ids: HashSet<u32> = HashSet::new();
        if !primary.is_empty() {
            if let Some(ids) = self.codes.get(&primary) {
                candidate_ids.extend(ids);
            }
            if alternate != primary {
                if let Some(ids) = self.codes.get(&alternate) {
                    candidate_ids.extend(ids);
                }
            }
        }

        let mut best: Option<(String, u64)> = None;
        for id in candidate_ids {
            let (candidate, frequency) = &self.words[id as usize];
            if candidate.chars().count().abs_diff(input_len) > MAX_LENGTH_DIFF {
                continue;
            }
            if best.as_ref().map(|(_, f)| frequency > f).unwrap_or(true) {
                best = Some((candidate.clone(), *frequency));
            }
        }

        let result = best.map(|(word, _)| word);
        self.cache.lock().unwrap().insert(lower, result.clone());
        result
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(lines: &str) -> FrequencyDictionary {
        FrequencyDictionary::from_reader(lines.as_bytes()).unwrap()
    }

    #[test]
    fn test_sound_alike_far_beyond_edit_distance() {
        let d = dict("necessary 121823682\nthe 1000\n");
        let index = PhoneticIndex::build(&d);
        // "nessesary" is 3 edits from "necessary", out of SymSpell range.
        assert_eq!(
            index.correct("nessesary", &d),
            Some("necessary".to_string())
        );
    }

    #[test]
    fn test_known_word_returns_none() {
        let d = dict("necessary 100\n");
        let index = PhoneticIndex::build(&d);
        assert_eq!(index.correct("necessary", &d), None);
    }

    #[test]
    fn test_length_window_filters_candidates() {
        // "me" and "mayonnaise" could share code prefixes; only close-length
        // candidates survive.
        let d = dict("fun 1000\nfondue 500\n");
        let index = PhoneticIndex::build(&d);
        // "fn"-coded input of length 3 cannot match a length-7+ candidate.
        assert_ne!(index.correct("fon", &d), Some("fondues".to_string()));
    }

    #[test]
    fn test_highest_frequency_wins() {
        // "night" and "knight" share a phonetic code.
        let d = dict("night 400000\nknight 20000\n");
        let index = PhoneticIndex::build(&d);
        assert_eq!(index.correct("nite", &d), Some("night".to_string()));
    }

    #[test]
    fn test_no_candidates() {
        let d = dict("zebra 100\n");
        let index = PhoneticIndex::build(&d);
        assert_eq!(index.correct("qwrtp", &d), None);
    }

    #[test]
    fn test_repeat_lookup_is_idempotent() {
        let d = dict("necessary 100\n");
        let index = PhoneticIndex::build(&d);
        let first = index.correct("nessesary", &d);
        let second = index.correct("nessesary", &d);
        assert_eq!(first, second);
    }

    #[test]
    fn test_alternate_code_is_indexed() {
        let d = dict("smith 1000\n");
        let index = PhoneticIndex::build(&d);
        // Primary SM0 and alternate SMT both point at the word.
        assert_eq!(index.code_count(), 2);
    }
}
