pub mod cache;
pub mod classify;
pub mod dictionary;
pub mod metaphone;
pub mod personal;
pub mod phonetic;
pub mod symspell;
pub mod tokenizer;

use crate::config::Config;
use crate::merge;
use crate::model::{self, ModelAdapter};
use crate::{Correction, ErrorType, Source};
use dictionary::FrequencyDictionary;
use once_cell::sync::OnceCell;
use personal::PersonalDictionary;
use phonetic::PhoneticIndex;
use regex::Regex;
use std::io;
use std::path::PathBuf;
use symspell::SymSpellIndex;
use thiserror::Error;
use tokenizer::Token;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read dictionary {path:?}: {source}")]
    DictionaryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to build dictionary index: {0}")]
    DictionaryBuild(String),
    #[error("personal dictionary i/o: {0}")]
    PersonalIo(#[from] io::Error),
    #[error("model adapter: {0}")]
    Model(String),
}

/// External producer of corrections in the engine's own shape (regex rule
/// checkers, the remote API client). Offsets must already be resolved
/// against the text handed to `produce`.
pub trait CorrectionProducer: Send + Sync {
    fn name(&self) -> &str;
    fn produce(&self, text: &str) -> Vec<Correction>;
}

/// The three read-only indices, built together on first use.
struct Lexicon {
    dictionary: FrequencyDictionary,
    symspell: SymSpellIndex,
    phonetic: PhoneticIndex,
}

const DISTANCE_ONE_CONFIDENCE: f32 = 0.9;
const DISTANCE_TWO_CONFIDENCE: f32 = 0.75;
const PHONETIC_CONFIDENCE: f32 = 0.65;

/// The correction resolution engine.
///
/// Owns the static indices (built once, never mutated afterwards), the
/// injected personal dictionary, an optional model adapter and any external
/// correction producers. All correction entry points are `&self`; the only
/// mutation after construction is `add_personal_word`.
pub struct CorrectionEngine {
    config: Config,
    lexicon: OnceCell<Lexicon>,
    personal: Box<dyn PersonalDictionary>,
    adapter: Option<Box<dyn ModelAdapter>>,
    producers: Vec<Box<dyn CorrectionProducer>>,
    ignore_patterns: Vec<Regex>,
}

impl CorrectionEngine {
    pub fn new(config: Config, personal: Box<dyn PersonalDictionary>) -> Self {
        let mut ignore_patterns = Vec::new();
        for pattern in &config.ignore_patterns {
            match Regex::new(pattern) {
                Ok(re) => ignore_patterns.push(re),
                Err(e) => eprintln!("Warning: invalid ignore pattern '{}': {}", pattern, e),
            }
        }

        Self {
            config,
            lexicon: OnceCell::new(),
            personal,
            adapter: None,
            producers: Vec::new(),
            ignore_patterns,
        }
    }

    pub fn set_model_adapter(&mut self, adapter: Box<dyn ModelAdapter>) {
        self.adapter = Some(adapter);
    }

    pub fn add_producer(&mut self, producer: Box<dyn CorrectionProducer>) {
        self.producers.push(producer);
    }

    /// Force index construction now instead of on the first correction.
    /// Concurrent callers share the same in-flight build; afterwards the
    /// indices are read-only.
    pub fn init(&self) {
        self.lexicon();
    }

    fn lexicon(&self) -> &Lexicon {
        self.lexicon.get_or_init(|| {
            let dictionary = FrequencyDictionary::load(self.config.dictionary.as_deref());
            let symspell = SymSpellIndex::build(&dictionary);
            let phonetic = PhoneticIndex::build(&dictionary);
            Lexicon {
                dictionary,
                symspell,
                phonetic,
            }
        })
    }

    /// Full correction pass: model pipeline (when an adapter is configured),
    /// dictionary pipeline, external producers, merged under the priority /
    /// overlap policy. Output is ordered by start offset.
    pub fn correct(&self, text: &str) -> Vec<Correction> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut streams = Vec::new();
        if let Some(adapter) = &self.adapter {
            streams.push(model::run_pipeline(
                text,
                self.config.max_chunk_words,
                adapter.as_ref(),
                self.personal.as_ref(),
            ));
        }
        streams.push(self.correct_local(text));
        for producer in &self.producers {
            streams.push(producer.produce(text));
        }

        merge::merge(streams, self.personal.as_ref())
    }

    /// Dictionary pipeline only: per-token exact lookup, then SymSpell, then
    /// the phonetic fallback. Always available and synchronous.
    pub fn correct_local(&self, text: &str) -> Vec<Correction> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let lex = self.lexicon();
        let mut corrections = Vec::new();

        for token in tokenizer::word_tokens(text) {
            if token.text.chars().count() <= 1 {
                continue;
            }
            if token.text.chars().any(|c| c.is_numeric()) {
                continue;
            }
            if self.should_ignore(token.text) {
                continue;
            }

            let lower = token.text.to_lowercase();
            if self.personal.contains(&lower) || lex.dictionary.is_known(&lower) {
                continue;
            }

            if let Some(suggestion) = lex.symspell.correct(&lower, &lex.dictionary) {
                let kind = classify::classify_word(&lower, &suggestion.word);
                let confidence = if suggestion.distance <= 1 {
                    DISTANCE_ONE_CONFIDENCE
                } else {
                    DISTANCE_TWO_CONFIDENCE
                };
                corrections.push(make_correction(&token, &suggestion.word, kind, confidence));
            } else if let Some(word) = lex.phonetic.correct(&lower, &lex.dictionary) {
                corrections.push(make_correction(
                    &token,
                    &word,
                    ErrorType::Phonetic,
                    PHONETIC_CONFIDENCE,
                ));
            }
        }

        corrections
    }

    /// Approve a word so no pipeline flags it again.
    pub fn add_personal_word(&mut self, word: &str) -> Result<(), EngineError> {
        self.personal.add(word)
    }

    pub fn personal(&self) -> &dyn PersonalDictionary {
        self.personal.as_ref()
    }

    /// Words in the loaded dictionary, for diagnostics.
    pub fn dictionary_size(&self) -> usize {
        self.lexicon().dictionary.len()
    }

    fn should_ignore(&self, word: &str) -> bool {
        self.ignore_patterns.iter().any(|re| re.is_match(word))
    }
}

fn make_correction(token: &Token, suggested: &str, kind: ErrorType, confidence: f32) -> Correction {
    Correction {
        original: token.text.to_string(),
        suggested: match_case(token.text, suggested),
        kind,
        start: token.start,
        end: token.end,
        confidence,
        explanation: Some(classify::explanation(kind).to_string()),
        source: Source::Rule,
    }
}

/// Carry the original token's leading capitalization over to the suggestion.
fn match_case(original: &str, suggested: &str) -> String {
    if original.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
        let mut chars = suggested.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        suggested.to_string()
    }
}
