use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::vocab::Vocab;

/// Raw relatedness scores in SICK-style corpora run 0-5; stored scores are
/// normalized to [0, 1].
pub const SCORE_SCALE: f32 = 5.0;

#[derive(Clone, Debug)]
pub struct SentencePair {
    pub sentence_a: String,
    pub sentence_b: String,
    pub score: f32,
}

impl SentencePair {
    pub fn new(sentence_a: &str, sentence_b: &str, score: f32) -> Self {
        Self {
            sentence_a: sentence_a.to_string(),
            sentence_b: sentence_b.to_string(),
            score,
        }
    }
}

/// Loads a similarity corpus and builds its vocabulary in one pass.
///
/// Expected format: one record per line, `sentence_a<TAB>sentence_b<TAB>score`,
/// with a header on the first line.
pub fn load_similarity_corpus(path: &Path) -> io::Result<(Vocab, Vec<SentencePair>)> {
    let file = File::open(path)?;
    read_similarity_corpus(BufReader::new(file))
}

pub fn read_similarity_corpus<R: BufRead>(mut reader: R) -> io::Result<(Vocab, Vec<SentencePair>)> {
    let mut vocab = Vocab::new();
    let mut pairs = Vec::new();

    // Skip header line
    let mut header_line = String::new();
    let _ = reader.read_line(&mut header_line)?;

    for line_res in reader.lines() {
        let line = line_res?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let sentence_a = fields.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "Missing sentence_a field")
        })?;
        let sentence_b = fields.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "Missing sentence_b field")
        })?;
        let score_str = fields
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "Missing score field"))?;

        let raw_score: f32 = score_str.trim().parse().map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidData, "Score is not a valid float")
        })?;
        let score = (raw_score / SCORE_SCALE).clamp(0.0, 1.0);

        vocab.add_sentence(sentence_a);
        vocab.add_sentence(sentence_b);
        pairs.push(SentencePair::new(sentence_a.trim(), sentence_b.trim(), score));
    }

    Ok((vocab, pairs))
}
