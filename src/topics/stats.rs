// RawTopicStats — the aggregated counts from one inference run.
//
// Built exactly once by `aggregate::aggregate` and immutable afterwards.
// Term-level tables are flat vectors addressed by (scope row, TermId):
//
//   topic table:       [topic * V + term]
//   year-topic table:  [(year * T + topic) * V + term]
//   doc-topic table:   [doc * T + topic]

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::bigrams::ScoredBigram;
use super::vocab::{TermId, Vocabulary};

/// Which slice of the corpus a label is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// One topic across every year
    Topic(usize),
    /// One topic restricted to documents from one year bin
    YearTopic { year: usize, topic: usize },
}

impl Scope {
    pub fn topic(&self) -> usize {
        match *self {
            Scope::Topic(topic) | Scope::YearTopic { topic, .. } => topic,
        }
    }
}

/// Only `StatsBuilder::finish` produces one, so the count identities always
/// hold. Serializable for export, never read back.
#[derive(Debug, Clone, Serialize)]
pub struct RawTopicStats {
    num_topics: usize,
    num_years: usize,
    vocab: Vocabulary,

    global_counts: Vec<u32>,
    total_words: u64,

    topic_counts: Vec<u32>,
    topic_totals: Vec<u64>,

    year_topic_counts: Vec<u32>,
    year_topic_totals: Vec<u64>,

    doc_ids: Vec<String>,
    doc_topic_counts: Vec<u64>,
    doc_word_counts: Vec<u64>,

    bigram_candidates: Vec<ScoredBigram>,
}

/// Mutable accumulator used during the aggregation pass. Consumed into
/// `RawTopicStats` once every document has been counted.
pub(crate) struct StatsBuilder {
    stats: RawTopicStats,
}

impl StatsBuilder {
    pub(crate) fn new(
        num_topics: usize,
        num_years: usize,
        vocab: Vocabulary,
        doc_ids: Vec<String>,
    ) -> Self {
        let v = vocab.len();
        let num_docs = doc_ids.len();
        Self {
            stats: RawTopicStats {
                num_topics,
                num_years,
                vocab,
                global_counts: vec![0; v],
                total_words: 0,
                topic_counts: vec![0; num_topics * v],
                topic_totals: vec![0; num_topics],
                year_topic_counts: vec![0; num_years * num_topics * v],
                year_topic_totals: vec![0; num_years * num_topics],
                doc_ids,
                doc_topic_counts: vec![0; num_docs * num_topics],
                doc_word_counts: vec![0; num_docs],
                bigram_candidates: Vec::new(),
            },
        }
    }

    /// Count one occurrence of `term` assigned to `topic` in document `doc`.
    pub(crate) fn count(&mut self, doc: usize, year: usize, topic: usize, term: TermId) {
        let s = &mut self.stats;
        let v = s.vocab.len();
        let t = s.num_topics;

        s.global_counts[term] += 1;
        s.total_words += 1;

        s.topic_counts[topic * v + term] += 1;
        s.topic_totals[topic] += 1;

        s.year_topic_counts[(year * t + topic) * v + term] += 1;
        s.year_topic_totals[year * t + topic] += 1;

        s.doc_topic_counts[doc * t + topic] += 1;
        s.doc_word_counts[doc] += 1;
    }

    pub(crate) fn finish(mut self, bigram_candidates: Vec<ScoredBigram>) -> Result<RawTopicStats> {
        self.stats.bigram_candidates = bigram_candidates;
        self.stats.check_invariants()?;
        Ok(self.stats)
    }
}

impl RawTopicStats {
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn num_years(&self) -> usize {
        self.num_years
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn total_words(&self) -> u64 {
        self.total_words
    }

    pub fn global_count(&self, term: TermId) -> u32 {
        self.global_counts[term]
    }

    /// Count of `term` in the whole corpus, looked up by text.
    pub fn global_count_of(&self, term: &str) -> u32 {
        self.vocab.id(term).map_or(0, |id| self.global_counts[id])
    }

    pub fn topic_total(&self, topic: usize) -> u64 {
        self.topic_totals[topic]
    }

    pub fn year_topic_total(&self, year: usize, topic: usize) -> u64 {
        self.year_topic_totals[year * self.num_topics + topic]
    }

    /// Fail with a descriptive error if `scope` lies outside the tables.
    pub fn check_scope(&self, scope: Scope) -> Result<()> {
        let topic = scope.topic();
        if topic >= self.num_topics {
            anyhow::bail!("Topic {} out of range (0..{})", topic, self.num_topics);
        }
        if let Scope::YearTopic { year, .. } = scope {
            if year >= self.num_years {
                anyhow::bail!("Year bin {} out of range (0..{})", year, self.num_years);
            }
        }
        Ok(())
    }

    /// Per-term counts for one scope, indexed by `TermId`.
    pub fn scope_row(&self, scope: Scope) -> &[u32] {
        let v = self.vocab.len();
        let row = match scope {
            Scope::Topic(topic) => topic,
            Scope::YearTopic { year, topic } => year * self.num_topics + topic,
        };
        let table = match scope {
            Scope::Topic(_) => &self.topic_counts,
            Scope::YearTopic { .. } => &self.year_topic_counts,
        };
        &table[row * v..(row + 1) * v]
    }

    pub fn scope_total(&self, scope: Scope) -> u64 {
        match scope {
            Scope::Topic(topic) => self.topic_total(topic),
            Scope::YearTopic { year, topic } => self.year_topic_total(year, topic),
        }
    }

    /// Count of `term` within a scope, looked up by text.
    pub fn scope_count_of(&self, scope: Scope, term: &str) -> u32 {
        self.vocab.id(term).map_or(0, |id| self.scope_row(scope)[id])
    }

    /// Non-zero (term, count) pairs for a scope, in vocabulary order.
    pub fn scope_word_counts(&self, scope: Scope) -> Vec<(&str, u32)> {
        self.scope_row(scope)
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(id, &c)| (self.vocab.term(id), c))
            .collect()
    }

    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    /// Per-topic word counts for one document (by position in the corpus).
    pub fn doc_topic_counts(&self, doc: usize) -> &[u64] {
        let t = self.num_topics;
        &self.doc_topic_counts[doc * t..(doc + 1) * t]
    }

    pub fn doc_word_count(&self, doc: usize) -> u64 {
        self.doc_word_counts[doc]
    }

    /// Discovered collocations, strongest first.
    pub fn bigram_candidates(&self) -> &[ScoredBigram] {
        &self.bigram_candidates
    }

    /// Verify the count identities that every consumer relies on:
    /// each scope's row sums to its total, topic totals sum to the corpus
    /// total, and document totals sum to the same number.
    pub fn check_invariants(&self) -> Result<()> {
        for topic in 0..self.num_topics {
            let scope = Scope::Topic(topic);
            let sum: u64 = self.scope_row(scope).iter().map(|&c| c as u64).sum();
            if sum != self.topic_total(topic) {
                anyhow::bail!(
                    "Topic {} word counts sum to {} but its total is {}",
                    topic,
                    sum,
                    self.topic_total(topic)
                );
            }
            for year in 0..self.num_years {
                let scope = Scope::YearTopic { year, topic };
                let sum: u64 = self.scope_row(scope).iter().map(|&c| c as u64).sum();
                if sum != self.year_topic_total(year, topic) {
                    anyhow::bail!(
                        "Year {} topic {} word counts sum to {} but its total is {}",
                        year,
                        topic,
                        sum,
                        self.year_topic_total(year, topic)
                    );
                }
            }
        }

        let topic_sum: u64 = self.topic_totals.iter().sum();
        let doc_sum: u64 = self.doc_word_counts.iter().sum();
        if topic_sum != self.total_words || doc_sum != self.total_words {
            anyhow::bail!(
                "Word totals disagree: topics {}, documents {}, corpus {}",
                topic_sum,
                doc_sum,
                self.total_words
            );
        }
        Ok(())
    }
}
