pub mod model;

pub use model::{manhattan_similarity, SiameseEncoder};

/// Dimension of the word embedding table.
pub const EMBEDDING_SIZE: usize = 300;

/// Width of the hidden layers applied after pooling.
pub const HIDDEN_SIZE: usize = 256;

/// Dimension of the final sentence representation.
pub const SENTENCE_DIM: usize = 128;
