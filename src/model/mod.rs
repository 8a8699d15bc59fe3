pub mod align;
pub mod chunker;

use crate::engine::personal::PersonalDictionary;
use crate::engine::EngineError;
use crate::Correction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Black-box sequence model that rewrites a chunk of text. Implementations
/// may be slow, flaky or unavailable; the pipeline treats every failure as
/// "no corrections from this chunk" and moves on.
pub trait ModelAdapter: Send + Sync {
    fn generate(&self, chunk: &str) -> Result<String, EngineError>;
}

/// Adapter for a local inference server speaking a minimal JSON contract:
/// POST `{"text": ...}`, receive `{"corrected": ...}`.
pub struct HttpModelAdapter {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    corrected: String,
}

impl HttpModelAdapter {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Model(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }
}

impl ModelAdapter for HttpModelAdapter {
    fn generate(&self, chunk: &str) -> Result<String, EngineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { text: chunk })
            .send()
            .map_err(|e| EngineError::Model(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EngineError::Model(format!(
                "inference server returned HTTP {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| EngineError::Model(e.to_string()))?;
        Ok(body.corrected)
    }
}

/// Run the model pipeline over the whole input: chunk, generate per chunk
/// (sequentially, to bound peak load and keep offsets simple), align each
/// rewrite back onto the original coordinates.
pub fn run_pipeline(
    text: &str,
    chunk_budget: usize,
    adapter: &dyn ModelAdapter,
    personal: &dyn PersonalDictionary,
) -> Vec<Correction> {
    let mut corrections = Vec::new();

    for chunk in chunker::chunk_text(text, chunk_budget) {
        match adapter.generate(chunk.text) {
            Ok(rewritten) => {
                corrections.extend(align::align_chunk(chunk.text, &rewritten, chunk.start, personal));
            }
            Err(e) => {
                // This chunk contributes nothing; the rest still run.
                eprintln!(
                    "Warning: model adapter failed on chunk at offset {}: {}",
                    chunk.start, e
                );
            }
        }
    }

    corrections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::personal::MemoryPersonalDictionary;

    /// Fixes "teh" everywhere, errors on chunks containing "poison".
    struct StubAdapter;

    impl ModelAdapter for StubAdapter {
        fn generate(&self, chunk: &str) -> Result<String, EngineError> {
            if chunk.contains("poison") {
                return Err(EngineError::Model("boom".to_string()));
            }
            Ok(chunk.replace("teh", "the"))
        }
    }

    #[test]
    fn test_pipeline_corrects_across_chunks() {
        let personal = MemoryPersonalDictionary::new();
        let text = "Typing teh word. Again teh same.";
        let corrections = run_pipeline(text, 4, &StubAdapter, &personal);
        assert_eq!(corrections.len(), 2);
        for c in &corrections {
            assert_eq!(c.suggested, "the");
            assert_eq!(&text[c.start..c.end], "teh");
        }
    }

    #[test]
    fn test_failed_chunk_does_not_poison_others() {
        let personal = MemoryPersonalDictionary::new();
        let text = "First teh chunk here. Then poison stops this. Last teh chunk here.";
        let corrections = run_pipeline(text, 5, &StubAdapter, &personal);
        // The poisoned middle chunk contributes zero corrections.
        assert_eq!(corrections.len(), 2);
    }

    #[test]
    fn test_unchanged_text_produces_nothing() {
        let personal = MemoryPersonalDictionary::new();
        let corrections = run_pipeline("All fine here.", 80, &StubAdapter, &personal);
        assert!(corrections.is_empty());
    }
}
