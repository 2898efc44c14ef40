// Input data model — what the external topic-inference run hands us.
//
// An inference result is a list of documents, each an ordered stream of
// (term, topic) assignments. Nothing here is computed; these types only
// describe and validate the boundary before the topics core touches it.

pub mod load;

use std::collections::HashSet;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One word occurrence and the topic the sampler assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    /// Raw topic index, before the junk-topic offset is subtracted
    pub topic: usize,
}

impl Token {
    pub fn new(term: impl Into<String>, topic: usize) -> Self {
        Self {
            term: term.into(),
            topic,
        }
    }
}

/// A single document from the inference run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable ID used to join against external metadata
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Calendar year, if the corpus carries one directly
    #[serde(default)]
    pub year: Option<i32>,
    /// Publication date; only consulted when `year` is absent
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Document {
    /// The document's calendar year, preferring an explicit year over the date.
    pub fn calendar_year(&self) -> Option<i32> {
        self.year.or_else(|| self.date.map(|d| d.year()))
    }
}

/// The complete output of one inference run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// Number of topics the sampler ran with, junk topics included
    pub num_topics: usize,
    pub documents: Vec<Document>,
}

impl InferenceResult {
    /// Reject malformed input before any aggregation starts.
    ///
    /// Checks that every token's topic is within the sampler's topic count,
    /// that the junk offset leaves the topic space well-formed, and that
    /// document IDs are unique (the metadata join is by exact ID).
    pub fn validate(&self, junk_topics: usize) -> Result<()> {
        if self.num_topics == 0 {
            anyhow::bail!("Inference result has zero topics");
        }
        if junk_topics > self.num_topics {
            anyhow::bail!(
                "Junk topic offset {} exceeds the number of topics ({})",
                junk_topics,
                self.num_topics
            );
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.documents.len());
        for doc in &self.documents {
            if !seen.insert(doc.id.as_str()) {
                anyhow::bail!("Duplicate document ID in inference result: {}", doc.id);
            }
            if let Some(token) = doc.tokens.iter().find(|t| t.topic >= self.num_topics) {
                anyhow::bail!(
                    "Document {} assigns '{}' to topic {}, but only {} topics exist",
                    doc.id,
                    token.term,
                    token.topic,
                    self.num_topics
                );
            }
        }
        Ok(())
    }

    /// Distinct calendar years present in the corpus, ascending.
    pub fn observed_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .documents
            .iter()
            .filter_map(Document::calendar_year)
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Ordered list of valid calendar years. A document's year bin is its
/// position in this list; anything unresolvable lands in bin 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearList(Vec<i32>);

impl YearList {
    pub fn new(years: Vec<i32>) -> Result<Self> {
        if years.is_empty() {
            anyhow::bail!("Year list is empty — at least one year bin is required");
        }
        Ok(Self(years))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.0
    }

    /// Resolve a calendar year to its bin. Missing or unknown years bin to 0.
    pub fn bin(&self, year: Option<i32>) -> usize {
        year.and_then(|y| self.0.iter().position(|&known| known == y))
            .unwrap_or(0)
    }
}

/// External per-document metadata, joined onto the aggregated counts by ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Resolved year bin (index into the year list)
    pub year: usize,
}

impl DocumentMeta {
    /// Build metadata straight from the inference result, for callers with
    /// no separate metadata source.
    pub fn from_inference(result: &InferenceResult, years: &YearList) -> Vec<DocumentMeta> {
        result
            .documents
            .iter()
            .map(|doc| DocumentMeta {
                id: doc.id.clone(),
                title: doc.title.clone(),
                year: years.bin(doc.calendar_year()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, tokens: Vec<Token>) -> Document {
        Document {
            id: id.to_string(),
            title: None,
            year: None,
            date: None,
            tokens,
        }
    }

    #[test]
    fn test_year_bin_defaults_to_zero() {
        let years = YearList::new(vec![2001, 2002, 2003]).unwrap();
        assert_eq!(years.bin(Some(2002)), 1);
        assert_eq!(years.bin(Some(1999)), 0);
        assert_eq!(years.bin(None), 0);
    }

    #[test]
    fn test_calendar_year_falls_back_to_date() {
        let mut d = doc("a", vec![]);
        d.date = NaiveDate::from_ymd_opt(2004, 6, 1);
        assert_eq!(d.calendar_year(), Some(2004));
        d.year = Some(2010);
        assert_eq!(d.calendar_year(), Some(2010));
    }

    #[test]
    fn test_validate_rejects_out_of_range_topic() {
        let result = InferenceResult {
            num_topics: 2,
            documents: vec![doc("a", vec![Token::new("gun", 2)])],
        };
        assert!(result.validate(0).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let result = InferenceResult {
            num_topics: 2,
            documents: vec![doc("a", vec![]), doc("a", vec![])],
        };
        assert!(result.validate(0).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_junk_offset() {
        let result = InferenceResult {
            num_topics: 2,
            documents: vec![],
        };
        assert!(result.validate(3).is_err());
        assert!(result.validate(2).is_ok());
    }

    #[test]
    fn test_empty_year_list_rejected() {
        assert!(YearList::new(vec![]).is_err());
    }
}
