// Salience scoring — rank candidate terms within one topic (or topic/year).
//
// For each sub-word w of a candidate:
//
//   subscore(w) = scope_count(w) / scope_total * -ln(global_count(w) / total_words)
//
// i.e. how common the word is inside the scope times how rare it is in the
// corpus as a whole. Unigrams use their single subscore, bigrams the sum of
// both, noun phrases the mean over all their words. A candidate is only
// scored if every one of its words occurs in the scope.

use std::cmp::Ordering;
use std::collections::HashSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{RawTopicStats, Scope};
use super::traits::TopicLabeler;
use super::vocab::TermId;

/// The kind of term used to label a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Unigram,
    Bigram,
    NounPhrase,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [
        Granularity::Unigram,
        Granularity::Bigram,
        Granularity::NounPhrase,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Unigram => "Unigram (one word)",
            Granularity::Bigram => "Bigram (two words)",
            Granularity::NounPhrase => "Noun phrase",
        }
    }

    /// Separator used when a label list is rendered as one string.
    pub fn separator(&self) -> &'static str {
        match self {
            Granularity::Unigram => " ",
            Granularity::Bigram | Granularity::NounPhrase => ", ",
        }
    }
}

/// A ranked term and its salience score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEntry {
    pub term: String,
    pub score: f64,
}

/// A candidate term resolved against the vocabulary.
#[derive(Debug, Clone)]
struct Candidate {
    text: String,
    words: Vec<TermId>,
}

/// Ranks a fixed universe of candidate terms by salience in any scope.
pub struct SalienceScorer<'a> {
    stats: &'a RawTopicStats,
    granularity: Granularity,
    candidates: Vec<Candidate>,
}

impl<'a> SalienceScorer<'a> {
    /// Score single words; the universe is the whole vocabulary.
    pub fn unigrams(stats: &'a RawTopicStats) -> Self {
        let candidates = stats
            .vocab()
            .iter()
            .map(|(id, term)| Candidate {
                text: term.to_string(),
                words: vec![id],
            })
            .collect();
        Self {
            stats,
            granularity: Granularity::Unigram,
            candidates,
        }
    }

    /// Score the bigram collocations discovered during aggregation.
    pub fn bigrams(stats: &'a RawTopicStats) -> Self {
        let candidates = stats
            .bigram_candidates()
            .iter()
            .map(|b| Candidate {
                text: b.text.clone(),
                words: vec![b.first, b.second],
            })
            .collect();
        Self {
            stats,
            granularity: Granularity::Bigram,
            candidates,
        }
    }

    /// Score an externally supplied list of multi-word phrases.
    ///
    /// Phrases containing a word that was never counted can't be present in
    /// any scope, so they're dropped up front. Duplicates are scored once.
    pub fn phrases(stats: &'a RawTopicStats, phrases: &[String]) -> Self {
        // Keyed on resolved words, so spacing variants of a phrase collapse
        let mut seen: HashSet<Vec<TermId>> = HashSet::new();
        let candidates: Vec<Candidate> = phrases
            .iter()
            .filter_map(|p| stats.vocab().resolve_words(p))
            .filter(|words| seen.insert(words.clone()))
            .map(|words| Candidate {
                text: words
                    .iter()
                    .map(|&w| stats.vocab().term(w))
                    .collect::<Vec<_>>()
                    .join(" "),
                words,
            })
            .collect();

        debug!(
            supplied = phrases.len(),
            usable = candidates.len(),
            "Resolved noun phrase candidates"
        );

        Self {
            stats,
            granularity: Granularity::NounPhrase,
            candidates,
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Rank every scoreable candidate in `scope` and keep the top `k`.
    pub fn rank(&self, scope: Scope, k: usize) -> Result<Vec<LabelEntry>> {
        self.stats.check_scope(scope)?;

        let row = self.stats.scope_row(scope);
        let scope_total = self.stats.scope_total(scope) as f64;
        let total_words = self.stats.total_words() as f64;
        if scope_total == 0.0 || total_words == 0.0 || k == 0 {
            return Ok(Vec::new());
        }

        let subscore = |w: TermId| -> f64 {
            let local = row[w] as f64 / scope_total;
            let global = self.stats.global_count(w) as f64 / total_words;
            local * -global.ln()
        };

        let mut ranked: Vec<LabelEntry> = self
            .candidates
            .iter()
            .filter(|c| c.words.iter().all(|&w| row[w] > 0))
            .map(|c| {
                let sum: f64 = c.words.iter().map(|&w| subscore(w)).sum();
                let score = match self.granularity {
                    Granularity::Unigram | Granularity::Bigram => sum,
                    Granularity::NounPhrase => sum / c.words.len() as f64,
                };
                LabelEntry {
                    term: c.text.clone(),
                    score,
                }
            })
            .collect();

        sort_labels(&mut ranked);
        ranked.truncate(k);
        Ok(ranked)
    }
}

impl TopicLabeler for SalienceScorer<'_> {
    fn granularity(&self) -> Granularity {
        self.granularity
    }

    fn label(&self, scope: Scope, k: usize) -> Result<Vec<LabelEntry>> {
        self.rank(scope, k)
    }
}

/// Score descending, then term text ascending.
pub fn sort_labels(labels: &mut [LabelEntry]) {
    labels.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
}
