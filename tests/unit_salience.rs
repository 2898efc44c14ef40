// Unit tests for salience ranking.
//
// All scores come from one document, "gun control gun violence control gun",
// with gun/control in topic 0 and violence in topic 1 (six words total):
//
//   gun      = 3/5 * -ln(3/6)
//   control  = 2/5 * -ln(2/6)
//   violence = 1/1 * -ln(1/6)

use topiclens::corpus::{Document, InferenceResult, Token, YearList};
use topiclens::topics::aggregate::{aggregate, AggregateOptions};
use topiclens::topics::salience::{Granularity, LabelEntry, SalienceScorer};
use topiclens::topics::stats::{RawTopicStats, Scope};
use topiclens::topics::traits::TopicLabeler;

const GUN: f64 = 0.4158883083359672;
const CONTROL: f64 = 0.43944491546724396;
const VIOLENCE: f64 = 1.791759469228055;

fn gun_control_stats() -> RawTopicStats {
    let tokens = [
        ("gun", 0),
        ("control", 0),
        ("gun", 0),
        ("violence", 1),
        ("control", 0),
        ("gun", 0),
    ];
    let result = InferenceResult {
        num_topics: 2,
        documents: vec![Document {
            id: "d1".into(),
            title: None,
            year: Some(2000),
            date: None,
            tokens: tokens.iter().map(|(w, t)| Token::new(*w, *t)).collect(),
        }],
    };
    let years = YearList::new(vec![2000]).unwrap();
    aggregate(&result, &years, &AggregateOptions::default()).unwrap()
}

fn terms(labels: &[LabelEntry]) -> Vec<&str> {
    labels.iter().map(|l| l.term.as_str()).collect()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================
// Unigrams
// ============================================================

#[test]
fn unigram_scores_weigh_local_frequency_by_global_rarity() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::unigrams(&stats);

    let topic0 = scorer.rank(Scope::Topic(0), 10).unwrap();
    assert_eq!(terms(&topic0), vec!["control", "gun"]);
    assert!(close(topic0[0].score, CONTROL), "control: {}", topic0[0].score);
    assert!(close(topic0[1].score, GUN), "gun: {}", topic0[1].score);

    let topic1 = scorer.rank(Scope::Topic(1), 10).unwrap();
    assert_eq!(terms(&topic1), vec!["violence"]);
    assert!(close(topic1[0].score, VIOLENCE));
}

#[test]
fn words_absent_from_scope_are_never_ranked() {
    let stats = gun_control_stats();
    let topic1 = SalienceScorer::unigrams(&stats).rank(Scope::Topic(1), 10).unwrap();
    assert!(topic1.iter().all(|l| l.term != "gun" && l.term != "control"));
}

#[test]
fn rank_truncates_to_k() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::unigrams(&stats);

    assert_eq!(terms(&scorer.rank(Scope::Topic(0), 1).unwrap()), vec!["control"]);
    assert!(scorer.rank(Scope::Topic(0), 0).unwrap().is_empty());
}

#[test]
fn year_scope_matches_topic_scope_for_a_single_year() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::unigrams(&stats);

    let global = scorer.rank(Scope::Topic(0), 10).unwrap();
    let year = scorer.rank(Scope::YearTopic { year: 0, topic: 0 }, 10).unwrap();
    assert_eq!(global, year);
}

#[test]
fn out_of_range_scope_is_an_error() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::unigrams(&stats);

    assert!(scorer.rank(Scope::Topic(2), 5).is_err());
    assert!(scorer.rank(Scope::YearTopic { year: 1, topic: 0 }, 5).is_err());
}

// ============================================================
// Bigrams
// ============================================================

#[test]
fn bigram_score_sums_both_words() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::bigrams(&stats);
    assert_eq!(scorer.granularity(), Granularity::Bigram);

    let topic0 = scorer.rank(Scope::Topic(0), 10).unwrap();
    // Equal scores, so text order decides
    assert_eq!(terms(&topic0), vec!["control gun", "gun control"]);
    assert!(close(topic0[0].score, GUN + CONTROL));
    assert!(close(topic0[1].score, GUN + CONTROL));
}

#[test]
fn bigram_needs_both_words_in_scope() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::bigrams(&stats);

    // "gun violence" and "violence control" straddle the two topics
    assert!(scorer.rank(Scope::Topic(1), 10).unwrap().is_empty());
    let topic0 = scorer.rank(Scope::Topic(0), 10).unwrap();
    assert!(!terms(&topic0).contains(&"gun violence"));
}

// ============================================================
// Noun phrases
// ============================================================

#[test]
fn phrase_score_is_mean_of_word_scores() {
    let stats = gun_control_stats();
    let phrases: Vec<String> = ["gun control", "control", "gun violence", "unknown phrase"]
        .iter()
        .map(|p| p.to_string())
        .collect();
    let scorer = SalienceScorer::phrases(&stats, &phrases);

    let topic0 = scorer.rank(Scope::Topic(0), 10).unwrap();
    assert_eq!(terms(&topic0), vec!["control", "gun control"]);
    assert!(close(topic0[0].score, CONTROL));
    assert!(close(topic0[1].score, (GUN + CONTROL) / 2.0));
}

#[test]
fn phrases_with_unknown_words_or_repeats_are_dropped() {
    let stats = gun_control_stats();
    let phrases: Vec<String> = ["gun control", "unknown phrase", "gun control", "violence"]
        .iter()
        .map(|p| p.to_string())
        .collect();
    let scorer = SalienceScorer::phrases(&stats, &phrases);

    assert_eq!(scorer.candidate_count(), 2);
    let topic1 = scorer.rank(Scope::Topic(1), 10).unwrap();
    assert_eq!(terms(&topic1), vec!["violence"]);

    // Spacing variants are the same phrase
    let spaced: Vec<String> = ["gun control", "gun  control", "gun\tcontrol", " gun control "]
        .iter()
        .map(|p| p.to_string())
        .collect();
    let scorer = SalienceScorer::phrases(&stats, &spaced);
    assert_eq!(scorer.candidate_count(), 1);
    let topic0 = scorer.rank(Scope::Topic(0), 10).unwrap();
    assert_eq!(terms(&topic0), vec!["gun control"]);
}

#[test]
fn no_phrases_means_no_labels() {
    let stats = gun_control_stats();
    let scorer = SalienceScorer::phrases(&stats, &[]);

    assert_eq!(scorer.candidate_count(), 0);
    assert!(scorer.rank(Scope::Topic(0), 10).unwrap().is_empty());
}

// ============================================================
// The labeler seam
// ============================================================

#[test]
fn labelers_are_interchangeable_behind_the_trait() {
    let stats = gun_control_stats();
    let phrases = vec!["gun control".to_string()];
    let labelers: Vec<Box<dyn TopicLabeler + '_>> = vec![
        Box::new(SalienceScorer::unigrams(&stats)),
        Box::new(SalienceScorer::bigrams(&stats)),
        Box::new(SalienceScorer::phrases(&stats, &phrases)),
    ];

    let kinds: Vec<Granularity> = labelers.iter().map(|l| l.granularity()).collect();
    assert_eq!(kinds, Granularity::ALL.to_vec());

    for labeler in &labelers {
        let labels = labeler.label(Scope::Topic(0), 3).unwrap();
        assert!(!labels.is_empty(), "{:?} produced no labels", labeler.granularity());
        for pair in labels.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
