use candle_core::{Device, Result, Tensor};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};

use corpus::{SentencePair, Vocab};

/// Sentence pairs staged for inference.
#[derive(Clone, Debug)]
pub struct Samples {
    pub pairs: Vec<SentencePair>,
}

impl Samples {
    pub fn new(pairs: Vec<SentencePair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Randomly reorders the pairs. A seed makes the order reproducible.
    pub fn shuffle(&mut self, seed: Option<u64>) {
        match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.pairs.shuffle(&mut rng);
            }
            None => self.pairs.shuffle(&mut thread_rng()),
        }
    }

    /// Batched view over the pairs as index/label tensors. The final batch
    /// may hold fewer than `batch_size` pairs.
    pub fn to_batched<'a>(
        &'a self,
        vocab: &'a Vocab,
        max_sent_len: usize,
        batch_size: usize,
        device: &'a Device,
    ) -> BatchedPairs<'a> {
        BatchedPairs {
            pairs: &self.pairs,
            vocab,
            max_sent_len,
            batch_size,
            device,
            idx: 0,
        }
    }
}

/// Iterator yielding `(sentence_a_indices, sentence_b_indices, labels)`
/// batches: two `(n, max_sent_len)` U32 tensors and one `(n, 1)` F32 tensor.
pub struct BatchedPairs<'a> {
    pairs: &'a [SentencePair],
    vocab: &'a Vocab,
    max_sent_len: usize,
    batch_size: usize,
    device: &'a Device,
    idx: usize,
}

impl BatchedPairs<'_> {
    fn make_batch(&self, batch: &[SentencePair]) -> Result<(Tensor, Tensor, Tensor)> {
        let mut a_data = Vec::with_capacity(batch.len() * self.max_sent_len);
        let mut b_data = Vec::with_capacity(batch.len() * self.max_sent_len);
        let mut labels = Vec::with_capacity(batch.len());

        for pair in batch {
            a_data.extend(self.vocab.encode(&pair.sentence_a, self.max_sent_len));
            b_data.extend(self.vocab.encode(&pair.sentence_b, self.max_sent_len));
            labels.push(pair.score);
        }

        let s1 = Tensor::from_vec(a_data, (batch.len(), self.max_sent_len), self.device)?;
        let s2 = Tensor::from_vec(b_data, (batch.len(), self.max_sent_len), self.device)?;
        let y = Tensor::from_vec(labels, (batch.len(), 1), self.device)?;

        Ok((s1, s2, y))
    }
}

impl Iterator for BatchedPairs<'_> {
    type Item = Result<(Tensor, Tensor, Tensor)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.pairs.len() {
            return None;
        }
        let end = (self.idx + self.batch_size).min(self.pairs.len());
        let batch = &self.pairs[self.idx..end];
        self.idx = end;

        Some(self.make_batch(batch))
    }
}
