// Colored terminal output for topic summaries, documents, and collocations.
//
// This module handles all terminal-specific formatting: colors, tables,
// bars. The main.rs commands delegate here.

use colored::Colorize;

use super::{format_labels, truncate_chars};
use crate::topics::bigrams::ScoredBigram;
use crate::topics::salience::Granularity;
use crate::topics::summary::{DocumentInfo, TopicSummary};

/// Display every topic with its labels and its share of each year.
pub fn display_summary(summary: &TopicSummary, granularity: Granularity) {
    println!(
        "\n{}",
        format!(
            "=== Topic Summary ({} topics, {} years, labels: {}) ===",
            summary.num_topics(),
            summary.years().len(),
            granularity.display_name()
        )
        .bold()
    );
    println!();

    let labels = summary.labels(granularity);
    let bar_width: usize = 20;
    let max_prop = summary
        .year_props()
        .iter()
        .flatten()
        .copied()
        .fold(0.0f64, f64::max);

    for topic in 0..summary.num_topics() {
        let label = labels
            .get(topic)
            .map(|l| format_labels(l, granularity))
            .unwrap_or_default();
        println!(
            "  {:>2}. {}",
            topic,
            truncate_chars(&label, 70).bold()
        );

        // One bar per year, scaled against the largest cell in the table
        for (year_index, year) in summary.years().iter().enumerate() {
            let prop = summary.year_props()[year_index][topic];
            let scaled = if max_prop > 0.0 { prop / max_prop } else { 0.0 };
            let filled = (scaled * bar_width as f64).round() as usize;
            let bar = format!(
                "[{}{}]",
                "=".repeat(filled),
                " ".repeat(bar_width.saturating_sub(filled))
            );
            println!("      {} {} {:.3}", year, colorize_bar(&bar, scaled), prop);
        }

        if let Some(words) = summary.topic_words().get(topic) {
            let preview: Vec<&str> = words.iter().take(10).map(|w| w.as_str()).collect();
            println!("      Words: {}", preview.join(", ").dimmed());
        }
        println!();
    }

    if !summary.unmatched_ids().is_empty() {
        println!(
            "  {} {} documents had no metadata and were left out of proportions",
            "~".yellow(),
            summary.unmatched_ids().len()
        );
    }
}

/// Display documents retrieved for a topic, with the topic's year labels.
pub fn display_documents(
    summary: &TopicSummary,
    topic: usize,
    year: Option<usize>,
    documents: &[&DocumentInfo],
    granularity: Granularity,
) {
    let scope = match year.and_then(|y| summary.years().get(y)) {
        Some(y) => format!("topic {topic}, {y}"),
        None => format!("topic {topic}"),
    };
    println!(
        "\n{}",
        format!("=== Documents for {} ({} shown) ===", scope, documents.len()).bold()
    );
    println!();

    if documents.is_empty() {
        println!("  No documents pass the {:.2} threshold.", summary.proportion_threshold());
    }

    for (i, doc) in documents.iter().enumerate() {
        let prop = doc
            .topic_props
            .as_ref()
            .and_then(|p| p.get(topic))
            .copied()
            .unwrap_or(0.0);
        let title = doc.title.as_deref().unwrap_or(doc.id.as_str());
        println!(
            "  {:>3}. {:<60} {:>5.2}",
            i + 1,
            truncate_chars(title, 57),
            prop
        );
    }

    println!("\n  {}", "Labels by year:".dimmed());
    for (year_index, labels) in summary.year_labels(granularity).iter().enumerate() {
        let text = labels
            .get(topic)
            .map(|l| format_labels(l, granularity))
            .unwrap_or_default();
        if let Some(y) = summary.years().get(year_index) {
            println!("    {}  {}", y, truncate_chars(&text, 90));
        }
    }
    println!();
}

/// Display the strongest bigram collocations with their G2 scores.
pub fn display_bigrams(bigrams: &[ScoredBigram]) {
    println!(
        "\n{}",
        format!("=== Top Bigrams ({}) ===", bigrams.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<36} {:>7}  {:>10}",
        "Rank".dimmed(),
        "Bigram".dimmed(),
        "Count".dimmed(),
        "G2".dimmed(),
    );
    println!("  {}", "-".repeat(62).dimmed());

    for (i, bigram) in bigrams.iter().enumerate() {
        println!(
            "  {:>4}. {:<36} {:>7} {:>10.3}",
            i + 1,
            truncate_chars(&bigram.text, 33),
            bigram.count,
            bigram.g2
        );
    }
    println!();
}

/// Color a proportion bar by relative strength.
fn colorize_bar(bar: &str, scaled: f64) -> colored::ColoredString {
    if scaled >= 0.5 {
        bar.bright_green()
    } else if scaled >= 0.2 {
        bar.bright_yellow()
    } else {
        bar.bright_blue()
    }
}
