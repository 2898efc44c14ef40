// Collocation discovery with the log-likelihood ratio (G2) test.
//
// Every adjacent pair in the unigram stream is a candidate. For a pair (a, b)
// the contingency counts are:
//
//   o11 = count(a b)          o12 = count(a as first word)
//   o21 = count(b as second)  o22 = (N - 1) - o21 - o12 + o11
//
// and the score is
//
//   G2 = 2 * (o11 * ln(o11 / e1) + o12 * ln(o12 / e2))
//
// with e1, e2 the expected counts under independence. Higher G2 means the
// two words co-occur more than chance would predict.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::vocab::{TermId, Vocabulary};

/// A discovered collocation and its G2 score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBigram {
    pub first: TermId,
    pub second: TermId,
    /// The bigram as display text: "first second"
    pub text: String,
    /// Number of times the pair occurred adjacently in the stream
    pub count: u32,
    pub g2: f64,
}

/// Return the `k` adjacent word pairs with the highest G2 score.
///
/// Ranking is fully deterministic: score descending, then first word,
/// then second word, both ascending by text.
pub fn discover(stream: &[TermId], vocab: &Vocabulary, k: usize) -> Vec<ScoredBigram> {
    if stream.len() < 2 || k == 0 {
        return Vec::new();
    }

    let positions = stream.len() - 1;
    let mut pair_counts: HashMap<(TermId, TermId), u32> = HashMap::new();
    let mut first_counts = vec![0u32; vocab.len()];
    let mut second_counts = vec![0u32; vocab.len()];

    for pair in stream.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        *pair_counts.entry((a, b)).or_insert(0) += 1;
        first_counts[a] += 1;
        second_counts[b] += 1;
    }

    let mut excluded = 0usize;
    let mut scored: Vec<ScoredBigram> = pair_counts
        .into_iter()
        .filter_map(|((a, b), count)| {
            let score = log_likelihood(
                count as f64,
                first_counts[a] as f64,
                second_counts[b] as f64,
                positions as f64,
            );
            if score.is_none() {
                excluded += 1;
            }
            score.map(|g2| ScoredBigram {
                first: a,
                second: b,
                text: format!("{} {}", vocab.term(a), vocab.term(b)),
                count,
                g2,
            })
        })
        .collect();

    debug!(
        positions,
        distinct = scored.len() + excluded,
        excluded,
        "Scored bigram candidates"
    );

    scored.sort_by(|x, y| {
        y.g2.partial_cmp(&x.g2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| vocab.term(x.first).cmp(vocab.term(y.first)))
            .then_with(|| vocab.term(x.second).cmp(vocab.term(y.second)))
    });
    scored.truncate(k);

    if let Some(top) = scored.first() {
        info!(
            bigrams = scored.len(),
            top_bigram = top.text.as_str(),
            top_g2 = top.g2,
            "Discovered bigram collocations"
        );
    }

    scored
}

/// G2 for one bigram, or `None` when an expected count is zero (the
/// logarithm would be undefined).
fn log_likelihood(o11: f64, o12: f64, o21: f64, positions: f64) -> Option<f64> {
    let o22 = positions - o21 - o12 + o11;

    let row_total1 = o11 + o21;
    let row_total2 = o12 + o22;
    let col_total = o11 + o12;
    let grand_total = row_total1 + row_total2;
    if grand_total <= 0.0 {
        return None;
    }

    let e1 = row_total1 * col_total / grand_total;
    let e2 = row_total2 * col_total / grand_total;
    if e1 <= 0.0 || e2 <= 0.0 {
        return None;
    }

    let g2 = 2.0 * (o11 * (o11 / e1).ln() + o12 * (o12 / e2).ln());
    g2.is_finite().then_some(g2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(words: &[&str]) -> (Vec<TermId>, Vocabulary) {
        let mut vocab = Vocabulary::new();
        let ids = words.iter().map(|w| vocab.intern(w)).collect();
        (ids, vocab)
    }

    #[test]
    fn test_single_pair() {
        let (ids, vocab) = stream(&["a", "b"]);
        let top = discover(&ids, &vocab, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].text, "a b");
        // o11=1, o12=1, o21=1, o22=0 -> e1=4/3, e2=2/3
        let expected = 2.0 * ((0.75f64).ln() + (1.5f64).ln());
        assert!((top[0].g2 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_too_short_stream() {
        let (ids, vocab) = stream(&["a"]);
        assert!(discover(&ids, &vocab, 10).is_empty());
        assert!(discover(&[], &vocab, 10).is_empty());
    }

    #[test]
    fn test_zero_expected_is_excluded() {
        // A zero first-word count forces col_total and both expectations to zero.
        assert_eq!(log_likelihood(0.0, 0.0, 1.0, 3.0), None);
        assert!(log_likelihood(1.0, 1.0, 1.0, 1.0).is_some());
    }
}
