pub mod checkpoint;
pub mod classifier;
pub mod evaluation;
pub mod network;
pub mod samples;

pub use classifier::SiameseClassifier;
