// TopicSummary — everything the presentation layer needs, derived from
// RawTopicStats plus external document metadata.
//
// Cheap to rebuild: it only reads the aggregated tables. The expensive part
// (aggregation and bigram discovery) happened once, upstream.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::salience::{Granularity, LabelEntry, SalienceScorer};
use super::stats::{RawTopicStats, Scope};
use super::traits::TopicLabeler;
use crate::corpus::{DocumentMeta, YearList};

/// Label list sizes and the document-retrieval threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOptions {
    /// Raw top words per topic (global scope, unigram salience)
    pub topic_words: usize,
    pub unigrams: usize,
    pub bigrams: usize,
    pub noun_phrases: usize,
    pub year_unigrams: usize,
    pub year_bigrams: usize,
    pub year_noun_phrases: usize,
    /// A document is retrieved for a topic when its proportion exceeds this
    pub proportion_threshold: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            topic_words: 20,
            unigrams: 6,
            bigrams: 4,
            noun_phrases: 4,
            year_unigrams: 10,
            year_bigrams: 10,
            year_noun_phrases: 10,
            proportion_threshold: 0.2,
        }
    }
}

impl SummaryOptions {
    /// (global, per-year) label sizes for a granularity.
    pub fn sizes(&self, granularity: Granularity) -> (usize, usize) {
        match granularity {
            Granularity::Unigram => (self.unigrams, self.year_unigrams),
            Granularity::Bigram => (self.bigrams, self.year_bigrams),
            Granularity::NounPhrase => (self.noun_phrases, self.year_noun_phrases),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.proportion_threshold) {
            anyhow::bail!(
                "Proportion threshold must be within [0, 1], got {}",
                self.proportion_threshold
            );
        }
        Ok(())
    }
}

/// Labels of one granularity, for every topic and every topic/year pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelSet {
    pub granularity: Granularity,
    /// Indexed by topic
    pub global: Vec<Vec<LabelEntry>>,
    /// Indexed by [year][topic]
    pub by_year: Vec<Vec<Vec<LabelEntry>>>,
}

/// A document's metadata plus its topic proportions, when resolvable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: String,
    pub title: Option<String>,
    /// Year bin
    pub year: usize,
    /// Share of the document's words assigned to each topic. `None` when the
    /// document never matched the inference run or has no countable words.
    pub topic_props: Option<Vec<f64>>,
}

impl DocumentInfo {
    /// The topic with the largest proportion; ties go to the lowest index.
    pub fn highest_topic(&self) -> Option<usize> {
        let props = self.topic_props.as_ref().filter(|p| !p.is_empty())?;
        let mut best = 0;
        for (topic, &p) in props.iter().enumerate() {
            if p > props[best] {
                best = topic;
            }
        }
        Some(best)
    }
}

/// The finished summary. Immutable once built; rebuild to change anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    num_topics: usize,
    years: Vec<i32>,
    year_props: Vec<Vec<f64>>,
    topic_order: Vec<Vec<usize>>,
    topic_words: Vec<Vec<String>>,
    unigram_labels: LabelSet,
    bigram_labels: LabelSet,
    noun_phrase_labels: LabelSet,
    documents: Vec<DocumentInfo>,
    unmatched_ids: Vec<String>,
    proportion_threshold: f64,
}

/// Derive a TopicSummary from the aggregated statistics.
///
/// `metadata` is joined onto the per-document counts by exact ID;
/// `phrases` is the noun-phrase candidate list (may be empty).
pub fn summarize(
    stats: &RawTopicStats,
    years: &YearList,
    metadata: &[DocumentMeta],
    phrases: &[String],
    options: &SummaryOptions,
) -> Result<TopicSummary> {
    options.validate()?;
    if years.len() != stats.num_years() {
        anyhow::bail!(
            "Year list has {} entries but the statistics were built with {}",
            years.len(),
            stats.num_years()
        );
    }
    if let Some(meta) = metadata.iter().find(|m| m.year >= years.len()) {
        anyhow::bail!(
            "Document {} has year bin {}, but only {} years are configured",
            meta.id,
            meta.year,
            years.len()
        );
    }

    let join = join_metadata(stats, metadata);
    let year_props = year_proportions(stats, metadata, &join.matches, years.len());
    let topic_order = year_props.iter().map(|row| order_topics(row)).collect();

    let unigrams = SalienceScorer::unigrams(stats);
    let bigrams = SalienceScorer::bigrams(stats);
    let noun_phrases = SalienceScorer::phrases(stats, phrases);

    let topic_words = (0..stats.num_topics())
        .map(|topic| -> Result<Vec<String>> {
            let words = unigrams.label(Scope::Topic(topic), options.topic_words)?;
            Ok(words.into_iter().map(|l| l.term).collect())
        })
        .collect::<Result<Vec<_>>>()?;

    let unigram_labels = build_label_set(&unigrams, stats, options)?;
    let bigram_labels = build_label_set(&bigrams, stats, options)?;
    let noun_phrase_labels = build_label_set(&noun_phrases, stats, options)?;

    info!(
        topics = stats.num_topics(),
        years = years.len(),
        documents = join.documents.len(),
        unmatched = join.unmatched_ids.len(),
        bigram_candidates = bigrams.candidate_count(),
        phrase_candidates = noun_phrases.candidate_count(),
        "Built topic summary"
    );

    Ok(TopicSummary {
        num_topics: stats.num_topics(),
        years: years.years().to_vec(),
        year_props,
        topic_order,
        topic_words,
        unigram_labels,
        bigram_labels,
        noun_phrase_labels,
        documents: join.documents,
        unmatched_ids: join.unmatched_ids,
        proportion_threshold: options.proportion_threshold,
    })
}

struct Join {
    documents: Vec<DocumentInfo>,
    /// (stats document index, metadata index) for every matched document
    matches: Vec<(usize, usize)>,
    unmatched_ids: Vec<String>,
}

fn join_metadata(stats: &RawTopicStats, metadata: &[DocumentMeta]) -> Join {
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(metadata.len());
    for (i, meta) in metadata.iter().enumerate() {
        if let Some(&first) = by_id.get(meta.id.as_str()) {
            warn!(
                id = meta.id.as_str(),
                kept = first,
                ignored = i,
                "Duplicate metadata ID, only the first entry gets proportions"
            );
            continue;
        }
        by_id.insert(meta.id.as_str(), i);
    }

    let mut documents: Vec<DocumentInfo> = metadata
        .iter()
        .map(|m| DocumentInfo {
            id: m.id.clone(),
            title: m.title.clone(),
            year: m.year,
            topic_props: None,
        })
        .collect();

    let mut matches = Vec::new();
    let mut unmatched_ids = Vec::new();

    for (doc, id) in stats.doc_ids().iter().enumerate() {
        let Some(&meta_index) = by_id.get(id.as_str()) else {
            warn!(id = id.as_str(), "No metadata for document, proportions left unresolved");
            unmatched_ids.push(id.clone());
            continue;
        };
        matches.push((doc, meta_index));

        let total = stats.doc_word_count(doc);
        if total > 0 {
            let props = stats
                .doc_topic_counts(doc)
                .iter()
                .map(|&c| c as f64 / total as f64)
                .collect();
            documents[meta_index].topic_props = Some(props);
        }
    }

    if !unmatched_ids.is_empty() {
        info!(unmatched = unmatched_ids.len(), "Documents without metadata");
    }

    Join {
        documents,
        matches,
        unmatched_ids,
    }
}

/// Within-year topic shares, scaled by each year's document volume relative
/// to the busiest year. Sparse years are damped rather than normalized up.
///
/// Shares only count matched documents; volume counts every metadata entry.
fn year_proportions(
    stats: &RawTopicStats,
    metadata: &[DocumentMeta],
    matches: &[(usize, usize)],
    num_years: usize,
) -> Vec<Vec<f64>> {
    let num_topics = stats.num_topics();
    let mut props = vec![vec![0.0; num_topics]; num_years];
    let mut year_words = vec![0u64; num_years];
    let mut year_docs = vec![0u64; num_years];

    for &(doc, meta_index) in matches {
        let year = metadata[meta_index].year;
        for (topic, &count) in stats.doc_topic_counts(doc).iter().enumerate() {
            props[year][topic] += count as f64;
        }
        year_words[year] += stats.doc_word_count(doc);
    }
    for meta in metadata {
        year_docs[meta.year] += 1;
    }

    let max_docs = year_docs.iter().copied().max().unwrap_or(0);

    for (year, row) in props.iter_mut().enumerate() {
        let volume = if max_docs > 0 {
            year_docs[year] as f64 / max_docs as f64
        } else {
            0.0
        };
        for cell in row.iter_mut() {
            *cell = if year_words[year] > 0 {
                *cell / year_words[year] as f64 * volume
            } else {
                0.0
            };
        }
    }

    props
}

/// Topic indices by descending proportion; ties keep ascending index.
fn order_topics(row: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..row.len()).collect();
    order.sort_by(|&a, &b| {
        row[b]
            .partial_cmp(&row[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    order
}

fn build_label_set(
    labeler: &dyn TopicLabeler,
    stats: &RawTopicStats,
    options: &SummaryOptions,
) -> Result<LabelSet> {
    let granularity = labeler.granularity();
    let (global_k, year_k) = options.sizes(granularity);
    let num_topics = stats.num_topics();

    let global = (0..num_topics)
        .map(|topic| labeler.label(Scope::Topic(topic), global_k))
        .collect::<Result<Vec<_>>>()?;

    let by_year = (0..stats.num_years())
        .into_par_iter()
        .map(|year| {
            (0..num_topics)
                .map(|topic| labeler.label(Scope::YearTopic { year, topic }, year_k))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LabelSet {
        granularity,
        global,
        by_year,
    })
}

impl TopicSummary {
    pub fn num_topics(&self) -> usize {
        self.num_topics
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Volume-scaled topic proportions, indexed by [year][topic].
    pub fn year_props(&self) -> &[Vec<f64>] {
        &self.year_props
    }

    /// Topics per year, largest proportion first.
    pub fn topic_order(&self) -> &[Vec<usize>] {
        &self.topic_order
    }

    pub fn topic_words(&self) -> &[Vec<String>] {
        &self.topic_words
    }

    pub fn label_set(&self, granularity: Granularity) -> &LabelSet {
        match granularity {
            Granularity::Unigram => &self.unigram_labels,
            Granularity::Bigram => &self.bigram_labels,
            Granularity::NounPhrase => &self.noun_phrase_labels,
        }
    }

    /// Global labels for every topic.
    pub fn labels(&self, granularity: Granularity) -> &[Vec<LabelEntry>] {
        &self.label_set(granularity).global
    }

    /// Per-year labels, indexed by [year][topic].
    pub fn year_labels(&self, granularity: Granularity) -> &[Vec<Vec<LabelEntry>>] {
        &self.label_set(granularity).by_year
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    /// IDs from the inference run that had no metadata entry.
    pub fn unmatched_ids(&self) -> &[String] {
        &self.unmatched_ids
    }

    pub fn proportion_threshold(&self) -> f64 {
        self.proportion_threshold
    }

    /// Documents belonging to `topic`: those whose proportion exceeds the
    /// threshold, or whose highest-proportion topic is `topic`. Sorted by
    /// that topic's proportion, descending.
    pub fn documents_for_topic(&self, topic: usize) -> Result<Vec<&DocumentInfo>> {
        self.retrieve(topic, None)
    }

    /// Same as `documents_for_topic`, restricted to one year bin.
    pub fn documents_for_topic_in_year(
        &self,
        year: usize,
        topic: usize,
    ) -> Result<Vec<&DocumentInfo>> {
        if year >= self.years.len() {
            anyhow::bail!("Year bin {} out of range (0..{})", year, self.years.len());
        }
        self.retrieve(topic, Some(year))
    }

    fn retrieve(&self, topic: usize, year: Option<usize>) -> Result<Vec<&DocumentInfo>> {
        if topic >= self.num_topics {
            anyhow::bail!("Topic {} out of range (0..{})", topic, self.num_topics);
        }

        let mut found: Vec<(&DocumentInfo, f64)> = self
            .documents
            .iter()
            .filter(|d| year.map_or(true, |y| d.year == y))
            .filter_map(|d| {
                let p = d.topic_props.as_ref()?[topic];
                let belongs = p > self.proportion_threshold || d.highest_topic() == Some(topic);
                belongs.then_some((d, p))
            })
            .collect();

        found.sort_by(|(da, pa), (db, pb)| {
            pb.partial_cmp(pa)
                .unwrap_or(Ordering::Equal)
                .then_with(|| da.id.cmp(&db.id))
        });

        Ok(found.into_iter().map(|(d, _)| d).collect())
    }
}
