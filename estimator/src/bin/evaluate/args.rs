use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "Similarity Evaluator")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Directory containing the similarity corpus.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Corpus file inside the data directory.
    #[arg(long, default_value = "extended_sick.txt")]
    pub corpus: String,

    /// Directory holding trained model checkpoints.
    #[arg(long, default_value = "models")]
    pub save_dir: PathBuf,

    /// Checkpoint tag to load.
    #[arg(long, default_value = "latest")]
    pub tag: String,

    /// Sentence pairs per inference batch. Inspection is per item, so this
    /// defaults to 1.
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Number of samples to examine before reporting averages.
    #[arg(long, default_value_t = 1000)]
    pub num_test_samples: usize,

    /// Maximum sentence length in tokens; longer sentences are truncated.
    #[arg(long, default_value_t = 30)]
    pub max_sent_len: usize,

    /// Seed for corpus shuffling. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}
