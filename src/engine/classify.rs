use crate::ErrorType;
use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Verb conjugation pairs that signal agreement errors rather than typos.
    static ref VERB_PAIRS: HashSet<(&'static str, &'static str)> = {
        let pairs = [
            ("is", "are"),
            ("is", "am"),
            ("are", "am"),
            ("was", "were"),
            ("has", "have"),
            ("does", "do"),
            ("goes", "go"),
            ("says", "say"),
            ("comes", "come"),
            ("makes", "make"),
            ("wants", "want"),
            ("likes", "like"),
            ("needs", "need"),
            ("isn't", "aren't"),
            ("wasn't", "weren't"),
            ("doesn't", "don't"),
        ];
        let mut set = HashSet::new();
        for (a, b) in pairs {
            set.insert((a, b));
            set.insert((b, a));
        }
        set
    };

    static ref PRONOUN_PAIRS: HashSet<(&'static str, &'static str)> = {
        let pairs = [
            ("i", "me"),
            ("he", "him"),
            ("she", "her"),
            ("we", "us"),
            ("they", "them"),
            ("who", "whom"),
        ];
        let mut set = HashSet::new();
        for (a, b) in pairs {
            set.insert((a, b));
            set.insert((b, a));
        }
        set
    };

    static ref ARTICLES: HashSet<&'static str> = ["a", "an", "the"].into_iter().collect();

    static ref FUNCTION_WORDS: HashSet<&'static str> = [
        "to", "of", "in", "on", "at", "for", "with", "from", "by", "as", "into",
        "onto", "about", "after", "before", "over", "under", "between", "through",
        "during", "without", "within", "upon", "off", "up", "down", "and", "or",
        "but", "so", "if", "that",
    ]
    .into_iter()
    .collect();
}

/// Assign a taxonomy label to an `(original, suggested)` edit. Single-word
/// pairs go through the character-shape heuristics; multi-word spans and pure
/// insertions through the grammar heuristics.
pub fn classify(original: &str, suggested: &str) -> ErrorType {
    let original = original.trim();
    let suggested = suggested.trim();

    let original_words = original.split_whitespace().count();
    let suggested_words = suggested.split_whitespace().count();

    if original_words <= 1 && suggested_words <= 1 && !original.is_empty() && !suggested.is_empty()
    {
        classify_word(original, suggested)
    } else {
        classify_span(original, suggested)
    }
}

/// Ordered heuristics over the character shape of a one-word edit.
pub fn classify_word(original: &str, suggested: &str) -> ErrorType {
    let o = original.to_lowercase();
    let s = suggested.to_lowercase();

    if VERB_PAIRS.contains(&(o.as_str(), s.as_str())) {
        return ErrorType::SubjectVerb;
    }
    if PRONOUN_PAIRS.contains(&(o.as_str(), s.as_str())) {
        return ErrorType::PronounCase;
    }
    if is_tense_shift(&o, &s) {
        return ErrorType::VerbTense;
    }

    let oc: Vec<char> = o.chars().collect();
    let sc: Vec<char> = s.chars().collect();

    if oc.len() == sc.len() {
        if is_adjacent_swap(&oc, &sc) {
            return ErrorType::Transposition;
        }
        let diffs = oc.iter().zip(&sc).filter(|(a, b)| a != b).count();
        if diffs == 1 {
            return ErrorType::Substitution;
        }
        return ErrorType::Spelling;
    }

    if oc.len() + 1 == sc.len() && skips_at_most_one(&oc, &sc) {
        return ErrorType::Omission;
    }
    if sc.len() + 1 == oc.len() && skips_at_most_one(&sc, &oc) {
        return ErrorType::Insertion;
    }

    if oc.len().abs_diff(sc.len()) >= 2 {
        return ErrorType::Phonetic;
    }

    ErrorType::Spelling
}

/// Grammar heuristics for multi-word spans and pure insertions/deletions.
fn classify_span(original: &str, suggested: &str) -> ErrorType {
    let original_words: Vec<String> = letters_only_words(original);
    let suggested_words: Vec<String> = letters_only_words(suggested);

    if original_words.is_empty() && !suggested_words.is_empty() {
        if suggested_words.iter().all(|w| ARTICLES.contains(w.as_str())) {
            return ErrorType::Article;
        }
        if suggested_words
            .iter()
            .all(|w| FUNCTION_WORDS.contains(w.as_str()))
        {
            return ErrorType::FunctionWord;
        }
        return ErrorType::Grammar;
    }

    // Same words, different punctuation: a run-on being split (or joined).
    if original_words == suggested_words && original.trim() != suggested.trim() {
        return ErrorType::RunOn;
    }

    ErrorType::Grammar
}

fn letters_only_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(|c| c.to_lowercase())
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// One side carries a past-tense suffix the other lacks, with matching stems
/// (walk/walked, stop/stopped).
fn is_tense_shift(a: &str, b: &str) -> bool {
    let (past, base) = if a.ends_with("ed") && !b.ends_with("ed") {
        (a, b)
    } else if b.ends_with("ed") && !a.ends_with("ed") {
        (b, a)
    } else {
        return false;
    };

    let stem = &past[..past.len() - 2];
    !stem.is_empty() && (stem == base || stem.starts_with(base) || base.starts_with(stem))
}

/// Exactly two differing positions, adjacent, with the characters swapped.
fn is_adjacent_swap(a: &[char], b: &[char]) -> bool {
    let diffs: Vec<usize> = (0..a.len()).filter(|&i| a[i] != b[i]).collect();
    diffs.len() == 2
        && diffs[1] == diffs[0] + 1
        && a[diffs[0]] == b[diffs[1]]
        && a[diffs[1]] == b[diffs[0]]
}

/// True when `shorter` aligns into `longer` leaving at most one character of
/// `longer` unmatched.
fn skips_at_most_one(shorter: &[char], longer: &[char]) -> bool {
    let mut skipped = 0;
    let mut i = 0;

    for &c in longer {
        if i < shorter.len() && shorter[i] == c {
            i += 1;
        } else {
            skipped += 1;
            if skipped > 1 {
                return false;
            }
        }
    }

    i == shorter.len()
}

/// Short UI-facing description of a correction kind.
pub fn explanation(kind: ErrorType) -> &'static str {
    match kind {
        ErrorType::Omission => "A letter appears to be missing",
        ErrorType::Insertion => "An extra letter appears to have slipped in",
        ErrorType::Transposition => "Two adjacent letters are swapped",
        ErrorType::Substitution => "One letter looks mistyped",
        ErrorType::Phonetic => "Spelled the way it sounds",
        ErrorType::Spelling => "Possible misspelling",
        ErrorType::SubjectVerb => "Verb may not agree with its subject",
        ErrorType::Article => "An article may be missing",
        ErrorType::VerbTense => "Verb tense may be inconsistent",
        ErrorType::FunctionWord => "A small connecting word may be missing",
        ErrorType::PronounCase => "Pronoun case may be wrong here",
        ErrorType::RunOn => "This may be a run-on sentence",
        ErrorType::Grammar => "Grammar could be improved",
        ErrorType::Confusion => "Commonly confused word",
        ErrorType::Clarity => "Could be clearer",
        ErrorType::Style => "Style suggestion",
    }
}
