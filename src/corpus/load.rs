// File loaders for the CLI. The library core only ever sees in-memory values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{DocumentMeta, InferenceResult};

/// Read an inference result from a JSON file.
pub fn load_inference(path: &Path) -> Result<InferenceResult> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inference result {}", path.display()))?;
    let result: InferenceResult = serde_json::from_str(&text)
        .with_context(|| format!("Malformed inference result in {}", path.display()))?;
    info!(
        path = %path.display(),
        documents = result.documents.len(),
        topics = result.num_topics,
        "Loaded inference result"
    );
    Ok(result)
}

/// Read external document metadata (a JSON array of `DocumentMeta`).
pub fn load_metadata(path: &Path) -> Result<Vec<DocumentMeta>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document metadata {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Malformed document metadata in {}", path.display()))
}

/// Read the noun-phrase candidate list: one phrase per line.
///
/// Phrase lists are generated offline and are optional — a missing file
/// just means no phrase labels, so it yields an empty list with a warning.
pub fn load_phrases(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        warn!(path = %path.display(), "Noun phrase file not found, phrase labels will be empty");
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read noun phrases {}", path.display()))?;
    Ok(parse_phrases(&text))
}

/// Split phrase-file text into normalized phrases (single-spaced, no blanks).
pub fn parse_phrases(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}
