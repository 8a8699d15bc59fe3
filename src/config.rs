use crate::model::chunker::DEFAULT_CHUNK_WORDS;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Frequency dictionary file (`word<space>frequency` lines, optionally
    /// gzipped). Falls back to the downloaded resource, then the embedded
    /// wordlist.
    pub dictionary: Option<PathBuf>,
    pub personal_dictionary: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,

    #[serde(default = "default_chunk_words")]
    pub max_chunk_words: usize,

    /// Local inference server for the model pipeline; the dictionary
    /// pipeline runs regardless.
    #[serde(default)]
    pub model_endpoint: Option<String>,

    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,
}

fn default_chunk_words() -> usize {
    DEFAULT_CHUNK_WORDS
}

fn default_model_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: None,
            personal_dictionary: None,
            ignore_patterns: vec![
                r"\b[A-Z0-9_]{2,}\b".to_string(),    // ALL_CAPS
                r"https?://\S+".to_string(),         // URLs
                r"\b[a-fA-F0-9]{32,}\b".to_string(), // Hashes
                r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}".to_string(), // Emails
            ],
            max_chunk_words: DEFAULT_CHUNK_WORDS,
            model_endpoint: None,
            model_timeout_secs: default_model_timeout(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global
    /// config > defaults.
    pub fn load(
        dictionary: Option<PathBuf>,
        personal_dict: Option<PathBuf>,
        cli_patterns: Vec<String>,
        model_endpoint: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(".correx.toml");
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        // Apply CLI overrides
        if let Some(dict) = dictionary {
            config.dictionary = Some(dict);
        }
        if let Some(dict) = personal_dict {
            config.personal_dictionary = Some(dict);
        }
        if !cli_patterns.is_empty() {
            config.ignore_patterns.extend(cli_patterns);
        }
        if let Some(endpoint) = model_endpoint {
            config.model_endpoint = Some(endpoint);
        }

        // Set default personal dictionary if not specified
        if config.personal_dictionary.is_none() {
            config.personal_dictionary = Self::default_personal_dict_path();
        }

        // Ensure personal dictionary file exists
        if let Some(path) = &config.personal_dictionary {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .context("Failed to create personal dictionary directory")?;
            }
            if !path.exists() {
                fs::write(path, "").context("Failed to create personal dictionary file")?;
            }
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        // Merge logic: other's values override self's if they differ from defaults
        if other.dictionary.is_some() {
            self.dictionary = other.dictionary;
        }
        if other.personal_dictionary.is_some() {
            self.personal_dictionary = other.personal_dictionary;
        }
        if !other.ignore_patterns.is_empty() {
            self.ignore_patterns = other.ignore_patterns;
        }
        if other.max_chunk_words != DEFAULT_CHUNK_WORDS {
            self.max_chunk_words = other.max_chunk_words;
        }
        if other.model_endpoint.is_some() {
            self.model_endpoint = other.model_endpoint;
        }
        if other.model_timeout_secs != default_model_timeout() {
            self.model_timeout_secs = other.model_timeout_secs;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "correx").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_personal_dict_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "correx").map(|dirs| dirs.config_dir().join("personal.txt"))
    }

    pub fn cache_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "correx").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "correx").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_chunk_words, 80);
        assert!(config.dictionary.is_none());
        assert!(config.model_endpoint.is_none());
        assert!(!config.ignore_patterns.is_empty());
    }

    #[test]
    fn test_merge_configs() {
        let base = Config::default();
        let override_config = Config {
            model_endpoint: Some("http://localhost:8080/generate".to_string()),
            max_chunk_words: 40,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(
            merged.model_endpoint.as_deref(),
            Some("http://localhost:8080/generate")
        );
        assert_eq!(merged.max_chunk_words, 40);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            dictionary = "/tmp/en.txt"
            ignore_patterns = []
            max_chunk_words = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.max_chunk_words, 60);
        assert_eq!(config.dictionary, Some(PathBuf::from("/tmp/en.txt")));
    }
}
