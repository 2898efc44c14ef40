use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::topics::aggregate::AggregateOptions;
use crate::topics::summary::SummaryOptions;

/// Central configuration loaded from environment variables.
///
/// Every tunable has a default, so an empty environment is valid. The .env
/// file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub aggregate: AggregateOptions,
    pub summary: SummaryOptions,
    /// Maximum documents shown by `topiclens documents`
    pub documents_to_display: usize,
    /// Configured year list; empty means "use the years found in the corpus"
    pub years: Vec<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aggregate: AggregateOptions::default(),
            summary: SummaryOptions::default(),
            documents_to_display: 15,
            years: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to defaults; set-but-unparsable ones are an
    /// error rather than being silently ignored.
    pub fn load() -> Result<Self> {
        let d = Config::default();

        let aggregate = AggregateOptions {
            junk_topics: var_or("TOPICLENS_JUNK_TOPICS", d.aggregate.junk_topics)?,
            max_unigrams: var_or("TOPICLENS_MAX_UNIGRAMS", d.aggregate.max_unigrams)?,
            top_bigrams: var_or("TOPICLENS_TOP_BIGRAMS", d.aggregate.top_bigrams)?,
        };

        let summary = SummaryOptions {
            topic_words: var_or("TOPICLENS_TOPIC_WORDS", d.summary.topic_words)?,
            unigrams: var_or("TOPICLENS_UNIGRAMS", d.summary.unigrams)?,
            bigrams: var_or("TOPICLENS_BIGRAMS", d.summary.bigrams)?,
            noun_phrases: var_or("TOPICLENS_NOUN_PHRASES", d.summary.noun_phrases)?,
            year_unigrams: var_or("TOPICLENS_YEAR_UNIGRAMS", d.summary.year_unigrams)?,
            year_bigrams: var_or("TOPICLENS_YEAR_BIGRAMS", d.summary.year_bigrams)?,
            year_noun_phrases: var_or(
                "TOPICLENS_YEAR_NOUN_PHRASES",
                d.summary.year_noun_phrases,
            )?,
            proportion_threshold: var_or(
                "TOPICLENS_PROP_THRESHOLD",
                d.summary.proportion_threshold,
            )?,
        };
        summary.validate()?;

        let years = match env::var("TOPICLENS_YEARS") {
            Ok(list) => parse_years(&list).context("TOPICLENS_YEARS")?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            aggregate,
            summary,
            documents_to_display: var_or(
                "TOPICLENS_DOCUMENTS_TO_DISPLAY",
                d.documents_to_display,
            )?,
            years,
        })
    }
}

/// Parse a comma-separated year list such as "2001, 2002,2003".
pub fn parse_years(list: &str) -> Result<Vec<i32>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .with_context(|| format!("'{s}' is not a valid year"))
        })
        .collect()
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: '{raw}'")),
        _ => Ok(default),
    }
}
