use super::EngineError;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Normalize a word the way the personal dictionary stores it: lowercase,
/// non-letters stripped. Also used by the merger to match correction
/// originals against approved words.
pub fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// User-approved words that must never be flagged, whichever pipeline would
/// otherwise have caught them. Injected into the engine so storage stays a
/// caller concern.
pub trait PersonalDictionary: Send + Sync {
    fn add(&mut self, word: &str) -> Result<(), EngineError>;
    fn contains(&self, word: &str) -> bool;
}

/// File-backed store: one word per line, `#` comments allowed, appended on
/// add. Persists across restarts.
pub struct FilePersonalDictionary {
    path: PathBuf,
    words: HashSet<String>,
}

impl FilePersonalDictionary {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let mut words = HashSet::new();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            for line in content.lines() {
                let word = line.trim();
                if !word.is_empty() && !word.starts_with('#') {
                    words.insert(normalize(word));
                }
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            words,
        })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl PersonalDictionary for FilePersonalDictionary {
    fn add(&mut self, word: &str) -> Result<(), EngineError> {
        let normalized = normalize(word);
        if normalized.is_empty() || !self.words.insert(normalized.clone()) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", normalized)?;
        Ok(())
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize(word))
    }
}

/// In-memory store for tests and embedding callers that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryPersonalDictionary {
    words: HashSet<String>,
}

impl MemoryPersonalDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I: IntoIterator<Item = S>, S: AsRef<str>>(words: I) -> Self {
        Self {
            words: words.into_iter().map(|w| normalize(w.as_ref())).collect(),
        }
    }
}

impl PersonalDictionary for MemoryPersonalDictionary {
    fn add(&mut self, word: &str) -> Result<(), EngineError> {
        let normalized = normalize(word);
        if !normalized.is_empty() {
            self.words.insert(normalized);
        }
        Ok(())
    }

    fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize(word))
    }
}
