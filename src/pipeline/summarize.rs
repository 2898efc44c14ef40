// Summarize pipeline: inference result on disk -> TopicSummary on disk.
//
// Strategy: load and validate the inputs, aggregate the raw statistics once
// (the expensive step), then derive the summary from those statistics plus
// document metadata. The core itself never touches the filesystem; all
// I/O lives here.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::Config;
use crate::corpus::load::{load_inference, load_metadata, load_phrases};
use crate::corpus::{DocumentMeta, InferenceResult, YearList};
use crate::topics::aggregate::aggregate;
use crate::topics::bigrams::ScoredBigram;
use crate::topics::stats::RawTopicStats;
use crate::topics::summary::{summarize, TopicSummary};

/// Where the pipeline reads its inputs from.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub corpus: PathBuf,
    /// External metadata; derived from the corpus when absent
    pub metadata: Option<PathBuf>,
    /// Noun-phrase candidates, one per line
    pub phrases: Option<PathBuf>,
    /// Year list override; falls back to config, then to the corpus
    pub years: Vec<i32>,
}

/// Everything one run produces.
pub struct Outcome {
    pub years: YearList,
    pub stats: RawTopicStats,
    pub summary: TopicSummary,
}

/// Pick the year list: explicit input, then configuration, then whatever
/// years the corpus itself contains.
pub fn resolve_years(explicit: &[i32], config: &Config, result: &InferenceResult) -> Result<YearList> {
    let years = if !explicit.is_empty() {
        explicit.to_vec()
    } else if !config.years.is_empty() {
        config.years.clone()
    } else {
        let observed = result.observed_years();
        info!(years = observed.len(), "No year list configured, using years found in the corpus");
        observed
    };
    // A corpus with no dates at all still needs one bin to land in
    if years.is_empty() {
        return YearList::new(vec![0]);
    }
    YearList::new(years)
}

/// Load the corpus and aggregate its statistics (no summary).
pub fn build_stats(config: &Config, corpus: &Path, years: &[i32]) -> Result<(YearList, RawTopicStats)> {
    let result = load_inference(corpus)?;
    let years = resolve_years(years, config, &result)?;

    let spinner = spinner("Aggregating topic statistics...")?;
    let stats = aggregate(&result, &years, &config.aggregate);
    spinner.finish_and_clear();

    Ok((years, stats?))
}

/// Load the corpus and discover its `count` strongest bigrams.
///
/// The candidate pool is sized to `count` for this call, so the listing is
/// not capped by the configured label pool.
pub fn top_bigrams(
    config: &Config,
    corpus: &Path,
    years: &[i32],
    count: usize,
) -> Result<Vec<ScoredBigram>> {
    let mut config = config.clone();
    config.aggregate.top_bigrams = count;
    let (_years, stats) = build_stats(&config, corpus, years)?;
    Ok(stats.bigram_candidates().to_vec())
}

/// Run the full pipeline: load, aggregate, summarize.
pub fn run(config: &Config, inputs: &Inputs) -> Result<Outcome> {
    let result = load_inference(&inputs.corpus)?;
    let years = resolve_years(&inputs.years, config, &result)?;

    let metadata = match &inputs.metadata {
        Some(path) => load_metadata(path)?,
        None => DocumentMeta::from_inference(&result, &years),
    };
    let phrases = match &inputs.phrases {
        Some(path) => load_phrases(path)?,
        None => Vec::new(),
    };

    let spinner = spinner("Aggregating topic statistics...")?;
    let built = aggregate(&result, &years, &config.aggregate).and_then(|stats| {
        spinner.set_message("Ranking topic labels...");
        let summary = summarize(&stats, &years, &metadata, &phrases, &config.summary)?;
        Ok((stats, summary))
    });
    spinner.finish_and_clear();
    let (stats, summary) = built?;

    Ok(Outcome {
        years,
        stats,
        summary,
    })
}

/// Write a summary as pretty-printed JSON.
pub fn write_summary(summary: &TopicSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved topic summary");
    Ok(())
}

/// Read a summary previously written by `write_summary`.
pub fn read_summary(path: &Path) -> Result<TopicSummary> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read summary {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Malformed summary in {}", path.display()))
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("  {spinner} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
