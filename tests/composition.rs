// Composition tests — verifying that the pipeline stages chain together.
//
// These tests exercise the data flow between modules:
//   JSON on disk -> InferenceResult -> RawTopicStats -> TopicSummary -> JSON
// using temporary directories only; nothing touches the network.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;

use topiclens::config::Config;
use topiclens::output::format_labels;
use topiclens::pipeline::summarize::{self, Inputs};
use topiclens::topics::salience::Granularity;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn tokens(text: &str, topic: usize) -> Vec<serde_json::Value> {
    text.split_whitespace()
        .map(|w| json!({ "term": w, "topic": topic }))
        .collect()
}

/// Three topics, the first a stopword topic meant to be dropped as junk.
fn corpus_json() -> String {
    let mut doc1 = tokens("the of", 0);
    doc1.extend(tokens("gun control gun control gun violence", 1));

    let mut doc2 = tokens("climate change climate change carbon", 2);
    doc2.extend(tokens("the", 0));

    let mut doc3 = tokens("gun control", 1);
    doc3.extend(tokens("climate change", 2));

    json!({
        "num_topics": 3,
        "documents": [
            { "id": "d1", "title": "Gun debate", "year": 2001, "tokens": doc1 },
            { "id": "d2", "title": "Warming", "date": "2002-05-01", "tokens": doc2 },
            { "id": "d3", "title": "Mixed", "year": 2002, "tokens": doc3 }
        ]
    })
    .to_string()
}

fn config() -> Config {
    let mut config = Config::default();
    config.aggregate.junk_topics = 1;
    config
}

#[test]
fn corpus_file_to_summary() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());
    let phrases = write(dir.path(), "phrases.txt", "gun control\nclimate  change\n\n");

    let inputs = Inputs {
        corpus,
        metadata: None,
        phrases: Some(phrases),
        years: vec![2001, 2002],
    };
    let outcome = summarize::run(&config(), &inputs).unwrap();

    assert_eq!(outcome.years.years(), &[2001, 2002]);
    assert_eq!(outcome.stats.num_topics(), 2);
    assert_eq!(outcome.stats.global_count_of("the"), 0);
    assert!(outcome.stats.check_invariants().is_ok());

    let summary = &outcome.summary;
    assert!(summary.unmatched_ids().is_empty());
    assert_eq!(summary.topic_words()[0][0], "gun");
    assert_eq!(summary.topic_words()[1][0], "change");

    let phrases = summary.labels(Granularity::NounPhrase);
    assert_eq!(format_labels(&phrases[0], Granularity::NounPhrase), "gun control");
    assert_eq!(format_labels(&phrases[1], Granularity::NounPhrase), "climate change");

    // d2 resolves its year from the date
    let d2 = summary.documents().iter().find(|d| d.id == "d2").unwrap();
    assert_eq!(d2.year, 1);
}

#[test]
fn summary_survives_a_round_trip_through_disk() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());
    let inputs = Inputs {
        corpus,
        metadata: None,
        phrases: None,
        years: vec![2001, 2002],
    };
    let outcome = summarize::run(&config(), &inputs).unwrap();

    let saved = dir.path().join("out").join("summary.json");
    summarize::write_summary(&outcome.summary, &saved).unwrap();
    let loaded = summarize::read_summary(&saved).unwrap();

    assert_eq!(loaded.years(), outcome.summary.years());
    assert_eq!(loaded.topic_order(), outcome.summary.topic_order());
    assert_eq!(loaded.documents(), outcome.summary.documents());
    assert_eq!(loaded.topic_words(), outcome.summary.topic_words());
    for (a, b) in loaded
        .labels(Granularity::Bigram)
        .iter()
        .zip(outcome.summary.labels(Granularity::Bigram))
    {
        assert_eq!(
            format_labels(a, Granularity::Bigram),
            format_labels(b, Granularity::Bigram)
        );
    }

    let ids: Vec<&str> = loaded
        .documents_for_topic(1)
        .unwrap()
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(ids, vec!["d2", "d3"]);
}

#[test]
fn external_metadata_is_joined_by_id() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());
    let metadata = write(
        dir.path(),
        "metadata.json",
        &json!([
            { "id": "d1", "title": "Gun debate", "year": 0 },
            { "id": "d2", "title": "Warming", "year": 1 }
        ])
        .to_string(),
    );

    let inputs = Inputs {
        corpus,
        metadata: Some(metadata),
        phrases: None,
        years: vec![2001, 2002],
    };
    let outcome = summarize::run(&config(), &inputs).unwrap();

    assert_eq!(outcome.summary.unmatched_ids(), &["d3".to_string()]);
    assert_eq!(outcome.summary.documents().len(), 2);
}

#[test]
fn missing_phrase_file_yields_empty_phrase_labels() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());

    let inputs = Inputs {
        corpus,
        metadata: None,
        phrases: Some(dir.path().join("no-such-file.txt")),
        years: vec![2001, 2002],
    };
    let outcome = summarize::run(&config(), &inputs).unwrap();

    assert!(outcome
        .summary
        .labels(Granularity::NounPhrase)
        .iter()
        .all(|labels| labels.is_empty()));
}

#[test]
fn years_fall_back_to_the_corpus() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());

    let (years, stats) = summarize::build_stats(&config(), &corpus, &[]).unwrap();
    assert_eq!(years.years(), &[2001, 2002]);
    assert_eq!(stats.num_years(), 2);
    assert!(!stats.bigram_candidates().is_empty());
}

#[test]
fn malformed_corpus_is_reported() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", "{ not json");

    let err = summarize::build_stats(&config(), &corpus, &[]).unwrap_err();
    assert!(format!("{err:#}").contains("Malformed inference result"));
}

#[test]
fn bigram_listing_is_not_capped_by_the_label_pool() {
    let dir = TempDir::new().unwrap();
    let corpus = write(dir.path(), "corpus.json", &corpus_json());
    let mut config = config();
    config.aggregate.top_bigrams = 1;

    let listed = summarize::top_bigrams(&config, &corpus, &[], 5).unwrap();
    assert_eq!(listed.len(), 5);
    for pair in listed.windows(2) {
        assert!(pair[0].g2 >= pair[1].g2);
    }

    let one = summarize::top_bigrams(&config, &corpus, &[], 1).unwrap();
    assert_eq!(one, listed[..1].to_vec());
}
