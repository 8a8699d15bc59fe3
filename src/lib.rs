pub mod cli;
pub mod config;
pub mod dict;
pub mod engine;
pub mod merge;
pub mod model;

pub use config::Config;
pub use engine::{CorrectionEngine, EngineError};

use serde::{Deserialize, Serialize};

/// Which producer a correction came from. The dictionary pipeline and the
/// regex rule checkers both report as `Rule`; the remote API producer reports
/// as `Api` with its offsets already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Model,
    Rule,
    Api,
}

impl Source {
    /// Rank used by the merger to break ties at the same start offset.
    /// Model and API suggestions outrank rule-based ones.
    pub fn rank(self) -> u8 {
        match self {
            Source::Model | Source::Api => 0,
            Source::Rule => 1,
        }
    }
}

/// Closed taxonomy of correction kinds. Spelling sub-kinds come out of the
/// dictionary pipeline, grammar sub-kinds out of the model pipeline; the
/// UI-facing kinds (Confusion/Clarity/Style) are produced by external
/// collaborators and passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    // Spelling
    Omission,
    Insertion,
    Transposition,
    Substitution,
    Phonetic,
    Spelling,
    // Grammar
    SubjectVerb,
    Article,
    VerbTense,
    FunctionWord,
    PronounCase,
    RunOn,
    Grammar,
    // Pass-through
    Confusion,
    Clarity,
    Style,
}

/// A single suggested edit, anchored in byte offsets of the original text.
/// `start == end` marks a pure insertion. The caller owns the mapping from
/// these offsets into any richer document representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub original: String,
    pub suggested: String,
    pub kind: ErrorType,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
    pub explanation: Option<String>,
    pub source: Source,
}

impl Correction {
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }

    pub fn span_len(&self) -> usize {
        self.end - self.start
    }
}

/// Apply a merged (non-overlapping, offset-sorted) correction list to the
/// text it was produced from. Applied back to front so earlier offsets stay
/// valid while later spans are rewritten.
pub fn apply_corrections(text: &str, corrections: &[Correction]) -> String {
    let mut ordered: Vec<&Correction> = corrections.iter().collect();
    ordered.sort_by_key(|c| (c.start, c.end));

    let mut result = text.to_string();
    for correction in ordered.iter().rev() {
        if correction.is_insertion() {
            let insert = if correction.start == 0 {
                format!("{} ", correction.suggested)
            } else {
                format!(" {}", correction.suggested)
            };
            result.insert_str(correction.start, &insert);
        } else {
            result.replace_range(correction.start..correction.end, &correction.suggested);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_rank() {
        assert_eq!(Source::Model.rank(), Source::Api.rank());
        assert!(Source::Model.rank() < Source::Rule.rank());
    }

    #[test]
    fn test_error_type_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorType::SubjectVerb).unwrap();
        assert_eq!(json, "\"subject_verb\"");
        let json = serde_json::to_string(&ErrorType::Phonetic).unwrap();
        assert_eq!(json, "\"phonetic\"");
    }

    #[test]
    fn test_apply_corrections() {
        let text = "I recieve mail form my freind";
        let corrections = vec![
            Correction {
                original: "recieve".into(),
                suggested: "receive".into(),
                kind: ErrorType::Transposition,
                start: 2,
                end: 9,
                confidence: 0.9,
                explanation: None,
                source: Source::Rule,
            },
            Correction {
                original: "freind".into(),
                suggested: "friend".into(),
                kind: ErrorType::Transposition,
                start: 23,
                end: 29,
                confidence: 0.9,
                explanation: None,
                source: Source::Rule,
            },
        ];
        assert_eq!(
            apply_corrections(text, &corrections),
            "I receive mail form my friend"
        );
    }

    #[test]
    fn test_apply_insertion() {
        let text = "I go the store";
        let corrections = vec![Correction {
            original: String::new(),
            suggested: "to".into(),
            kind: ErrorType::FunctionWord,
            start: 4,
            end: 4,
            confidence: 0.75,
            explanation: None,
            source: Source::Model,
        }];
        assert_eq!(apply_corrections(text, &corrections), "I go to the store");
    }

    #[test]
    fn test_insertion_span() {
        let c = Correction {
            original: String::new(),
            suggested: "to".to_string(),
            kind: ErrorType::FunctionWord,
            start: 4,
            end: 4,
            confidence: 0.8,
            explanation: None,
            source: Source::Model,
        };
        assert!(c.is_insertion());
        assert_eq!(c.span_len(), 0);
    }
}
