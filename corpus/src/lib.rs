pub mod pairs;
pub mod vocab;

pub use pairs::{load_similarity_corpus, SentencePair};
pub use vocab::Vocab;
