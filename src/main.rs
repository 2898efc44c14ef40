use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use topiclens::config::Config;
use topiclens::output::terminal;
use topiclens::pipeline::summarize::{self, Inputs};
use topiclens::topics::salience::Granularity;

/// topiclens: summarized, ranked topic statistics from topic-model output.
///
/// Turns per-word topic assignments into labeled topics, topic shares over
/// time, and per-document topic membership.
#[derive(Parser)]
#[command(name = "topiclens", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate an inference result and build a topic summary
    Summarize {
        /// Inference result (JSON) with per-word topic assignments
        #[arg(long)]
        corpus: PathBuf,

        /// Document metadata (JSON); derived from the corpus if omitted
        #[arg(long)]
        metadata: Option<PathBuf>,

        /// Noun-phrase candidates, one per line
        #[arg(long)]
        phrases: Option<PathBuf>,

        /// Comma-separated year list (e.g. 2001,2002,2003)
        #[arg(long, value_delimiter = ',')]
        years: Vec<i32>,

        /// Which labels to show in the terminal
        #[arg(long, value_enum, default_value = "unigram")]
        label_type: LabelType,

        /// Where to write the summary JSON
        #[arg(long, default_value = "output/topic-summary.json")]
        output: PathBuf,
    },

    /// List the documents belonging to a topic, from a saved summary
    Documents {
        /// Summary JSON written by `topiclens summarize`
        #[arg(long, default_value = "output/topic-summary.json")]
        summary: PathBuf,

        /// Topic index
        #[arg(long)]
        topic: usize,

        /// Restrict to one year bin (index into the year list)
        #[arg(long)]
        year: Option<usize>,

        /// Which labels to show alongside the documents
        #[arg(long, value_enum, default_value = "unigram")]
        label_type: LabelType,
    },

    /// Show the strongest bigram collocations in a corpus
    Bigrams {
        /// Inference result (JSON) with per-word topic assignments
        #[arg(long)]
        corpus: PathBuf,

        /// How many bigrams to show (default: 25)
        #[arg(long, default_value = "25")]
        count: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LabelType {
    Unigram,
    Bigram,
    NounPhrase,
}

impl From<LabelType> for Granularity {
    fn from(label: LabelType) -> Self {
        match label {
            LabelType::Unigram => Granularity::Unigram,
            LabelType::Bigram => Granularity::Bigram,
            LabelType::NounPhrase => Granularity::NounPhrase,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topiclens=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Summarize {
            corpus,
            metadata,
            phrases,
            years,
            label_type,
            output,
        } => {
            println!("Summarizing topics from {}...", corpus.display());

            let inputs = Inputs {
                corpus,
                metadata,
                phrases,
                years,
            };
            let outcome = summarize::run(&config, &inputs)?;

            info!(
                years = outcome.years.len(),
                documents = outcome.stats.num_docs(),
                "Summary ready"
            );

            terminal::display_summary(&outcome.summary, label_type.into());
            summarize::write_summary(&outcome.summary, &output)?;

            println!(
                "\n{}",
                format!("Summary saved to: {}", output.display()).bold()
            );
            println!(
                "{}",
                "Next: topiclens documents --topic <n> to see a topic's documents".dimmed()
            );
        }

        Commands::Documents {
            summary,
            topic,
            year,
            label_type,
        } => {
            let summary = summarize::read_summary(&summary)?;

            let mut documents = match year {
                Some(year) => summary.documents_for_topic_in_year(year, topic)?,
                None => summary.documents_for_topic(topic)?,
            };
            documents.truncate(config.documents_to_display);

            terminal::display_documents(&summary, topic, year, &documents, label_type.into());
        }

        Commands::Bigrams { corpus, count } => {
            let bigrams = summarize::top_bigrams(&config, &corpus, &config.years, count)?;

            if bigrams.is_empty() {
                println!("No bigrams found: the corpus has fewer than two countable words.");
                return Ok(());
            }

            terminal::display_bigrams(&bigrams);
        }
    }

    Ok(())
}
