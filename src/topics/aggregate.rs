// Corpus aggregation — one inference result in, one RawTopicStats out.
//
// Two passes over the corpus. The first interns every countable term and
// records the capped unigram stream for bigram discovery; the second fills
// the flat count tables, which can only be sized once the vocabulary is
// known. Words whose topic falls below the junk offset are dropped in the
// first pass and never counted anywhere.

use anyhow::Result;
use tracing::{debug, info};

use super::bigrams;
use super::stats::{RawTopicStats, StatsBuilder};
use super::vocab::{TermId, Vocabulary};
use crate::corpus::{InferenceResult, YearList};

/// Tunables for the aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Number of low-index topics to discard (stopword topics)
    pub junk_topics: usize,
    /// Maximum length of the unigram stream fed to bigram discovery.
    /// Aggregation counts are never truncated.
    pub max_unigrams: usize,
    /// How many bigram collocations to keep as label candidates
    pub top_bigrams: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            junk_topics: 0,
            max_unigrams: 50_000,
            top_bigrams: 300,
        }
    }
}

/// Build the complete, immutable statistics for one inference run.
///
/// Input is validated first; any violation fails the whole build, so a
/// caller never sees partially aggregated counts.
pub fn aggregate(
    result: &InferenceResult,
    years: &YearList,
    options: &AggregateOptions,
) -> Result<RawTopicStats> {
    result.validate(options.junk_topics)?;

    let num_topics = result.num_topics - options.junk_topics;
    let mut vocab = Vocabulary::new();
    let mut unigrams: Vec<TermId> = Vec::new();
    let mut skipped = 0usize;

    // Pass 1: intern countable words, keeping (term, topic) per document
    let interned: Vec<Vec<(TermId, usize)>> = result
        .documents
        .iter()
        .map(|doc| {
            doc.tokens
                .iter()
                .filter_map(|token| match token.topic.checked_sub(options.junk_topics) {
                    Some(topic) => {
                        let term = vocab.intern(&token.term);
                        if unigrams.len() < options.max_unigrams {
                            unigrams.push(term);
                        }
                        Some((term, topic))
                    }
                    None => {
                        skipped += 1;
                        None
                    }
                })
                .collect()
        })
        .collect();

    debug!(
        skipped,
        junk_topics = options.junk_topics,
        "Dropped words assigned to junk topics"
    );

    let candidates = bigrams::discover(&unigrams, &vocab, options.top_bigrams);

    // Pass 2: fill the tables
    let doc_ids = result.documents.iter().map(|d| d.id.clone()).collect();
    let mut builder = StatsBuilder::new(num_topics, years.len(), vocab, doc_ids);

    for (doc_index, (doc, tokens)) in result.documents.iter().zip(&interned).enumerate() {
        let year = years.bin(doc.calendar_year());
        for &(term, topic) in tokens {
            builder.count(doc_index, year, topic, term);
        }
    }

    let stats = builder.finish(candidates)?;

    info!(
        documents = stats.num_docs(),
        topics = stats.num_topics(),
        years = stats.num_years(),
        vocabulary = stats.vocab().len(),
        words = stats.total_words(),
        bigram_stream = unigrams.len(),
        "Aggregated topic statistics"
    );

    Ok(stats)
}
