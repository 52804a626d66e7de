use candle_core::{DType, Device, Result, Tensor};
use candle_nn::loss::mse;
use candle_nn::{VarBuilder, VarMap};

use crate::network::{manhattan_similarity, SiameseEncoder};

/// Shared-weight classifier scoring sentence pairs in [0, 1].
pub struct SiameseClassifier {
    encoder: SiameseEncoder,
    varmap: VarMap,
    device: Device,
}

/// Outcome of one inference step over a batch.
pub struct TestStep {
    /// Predicted similarity per pair, shape `(batch, 1)`.
    pub predictions: Tensor,
    /// Mean-squared error of the predictions against the labels.
    pub loss: f32,
}

impl SiameseClassifier {
    pub fn new(vocab_size: usize, device: &Device) -> Result<Self> {
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, device);
        let encoder = SiameseEncoder::new(vocab_size, &vs)?;

        Ok(Self {
            encoder,
            varmap,
            device: device.clone(),
        })
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn varmap_mut(&mut self) -> &mut VarMap {
        &mut self.varmap
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Predicts similarity scores for a batch of index-sequence pairs.
    pub fn forward(&self, sentences_a: &Tensor, sentences_b: &Tensor) -> Result<Tensor> {
        let encoded_a = self.encoder.encode(sentences_a)?;
        let encoded_b = self.encoder.encode(sentences_b)?;
        manhattan_similarity(&encoded_a, &encoded_b)
    }

    /// Runs inference on a batch and reports predictions plus scalar loss.
    pub fn test_step(
        &self,
        sentences_a: &Tensor,
        sentences_b: &Tensor,
        labels: &Tensor,
    ) -> Result<TestStep> {
        let predictions = self.forward(sentences_a, sentences_b)?;
        let loss = mse(&predictions, labels)?.to_vec0::<f32>()?;

        Ok(TestStep { predictions, loss })
    }
}
