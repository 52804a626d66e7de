use candle_core::{DType, Result, Tensor, D};
use candle_nn::{embedding, linear, Embedding, Linear, Module, VarBuilder};

use corpus::vocab::PAD_INDEX;

use super::{EMBEDDING_SIZE, HIDDEN_SIZE, SENTENCE_DIM};

/// Candle encoder mapping padded index sequences to sentence vectors.
/// Both sentences of a pair go through the same instance, so the weights
/// are shared by construction.
pub struct SiameseEncoder {
    embedding: Embedding,
    hidden1: Linear,
    hidden2: Linear,
    output: Linear,
}

impl SiameseEncoder {
    pub fn new(vocab_size: usize, vs: &VarBuilder) -> Result<Self> {
        Ok(Self {
            embedding: embedding(vocab_size, EMBEDDING_SIZE, vs.pp("embedding"))?,
            hidden1: linear(EMBEDDING_SIZE, HIDDEN_SIZE, vs.pp("hidden1"))?,
            hidden2: linear(HIDDEN_SIZE, HIDDEN_SIZE, vs.pp("hidden2"))?,
            output: linear(HIDDEN_SIZE, SENTENCE_DIM, vs.pp("output"))?,
        })
    }

    /// Encodes a `(batch, seq_len)` U32 index tensor into `(batch, SENTENCE_DIM)`.
    pub fn encode(&self, tokens: &Tensor) -> Result<Tensor> {
        let embedded = self.embedding.forward(tokens)?;
        let pooled = masked_mean(&embedded, tokens)?;

        let h1 = pooled.apply(&self.hidden1)?.relu()?;
        let h2 = (h1.apply(&self.hidden2)? + &h1)?.relu()?;
        h2.apply(&self.output)
    }
}

// Mean over non-padding positions. Padding embeddings must not dilute short
// sentences, so the sum is masked and divided by the real token count
// (floored at one to keep all-padding rows finite).
fn masked_mean(embedded: &Tensor, tokens: &Tensor) -> Result<Tensor> {
    let mask = tokens.ne(PAD_INDEX)?.to_dtype(DType::F32)?;
    let summed = embedded.broadcast_mul(&mask.unsqueeze(D::Minus1)?)?.sum(1)?;
    let lengths = mask.sum_keepdim(D::Minus1)?.maximum(1f32)?;
    summed.broadcast_div(&lengths)
}

/// Similarity of two sentence-vector batches as the exponentiated negative
/// Manhattan distance. Output shape is `(batch, 1)` with values in (0, 1];
/// identical vectors score exactly 1.
pub fn manhattan_similarity(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let distance = (a - b)?.abs()?.sum_keepdim(D::Minus1)?;
    distance.neg()?.exp()
}

#[cfg(test)]
mod tests {
    use candle_core::Device;
    use candle_nn::VarMap;

    use super::*;

    const VOCAB_SIZE: usize = 32;

    fn test_encoder() -> Result<SiameseEncoder> {
        let vm = VarMap::new();
        let vb = VarBuilder::from_varmap(&vm, DType::F32, &Device::Cpu);
        SiameseEncoder::new(VOCAB_SIZE, &vb)
    }

    fn index_tensor(rows: &[&[u32]]) -> Result<Tensor> {
        let seq_len = rows[0].len();
        let data: Vec<u32> = rows.iter().flat_map(|row| row.iter().copied()).collect();
        Tensor::from_vec(data, (rows.len(), seq_len), &Device::Cpu)
    }

    #[test]
    fn encode_produces_sentence_vectors() -> Result<()> {
        let encoder = test_encoder()?;
        let tokens = index_tensor(&[&[2, 3, 4, 0], &[5, 6, 0, 0]])?;

        let vectors = encoder.encode(&tokens)?;
        assert_eq!(vectors.dims(), &[2, SENTENCE_DIM]);
        Ok(())
    }

    #[test]
    fn identical_sentences_score_one() -> Result<()> {
        let encoder = test_encoder()?;
        let tokens = index_tensor(&[&[2, 3, 4, 0]])?;

        let vector = encoder.encode(&tokens)?;
        let similarity = manhattan_similarity(&vector, &vector)?;
        let value = f32::try_from(similarity.get(0)?.squeeze(0)?)?;
        assert_eq!(value, 1.0);
        Ok(())
    }

    #[test]
    fn similarity_stays_in_unit_interval() -> Result<()> {
        let encoder = test_encoder()?;
        let a = encoder.encode(&index_tensor(&[&[2, 3, 4, 5]])?)?;
        let b = encoder.encode(&index_tensor(&[&[6, 7, 8, 9]])?)?;

        let similarity = manhattan_similarity(&a, &b)?;
        let value = f32::try_from(similarity.get(0)?.squeeze(0)?)?;
        assert!(value > 0.0 && value <= 1.0);
        Ok(())
    }

    #[test]
    fn all_padding_input_is_finite() -> Result<()> {
        let encoder = test_encoder()?;
        let tokens = index_tensor(&[&[0, 0, 0, 0]])?;

        let vector = encoder.encode(&tokens)?;
        for value in vector.get(0)?.to_vec1::<f32>()? {
            assert!(value.is_finite());
        }
        Ok(())
    }
}
