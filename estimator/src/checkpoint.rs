use candle_nn::VarMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of a named, tagged checkpoint inside a save directory.
pub fn path(save_dir: &Path, name: &str, tag: &str) -> PathBuf {
    save_dir.join(format!("{}_{}.safetensors", name, tag))
}

pub fn save(varmap: &VarMap, checkpoint_path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = checkpoint_path.parent() {
        fs::create_dir_all(parent)?;
    }
    varmap.save(checkpoint_path)?;
    Ok(())
}

/// Restores saved variables into an existing model. Shapes must match the
/// variables already registered in the varmap.
pub fn load(varmap: &mut VarMap, checkpoint_path: &Path) -> Result<(), Box<dyn Error>> {
    varmap.load(checkpoint_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use candle_core::{Device, Tensor};

    use crate::SiameseClassifier;

    use super::*;

    const VOCAB_SIZE: usize = 32;

    fn batch(device: &Device) -> candle_core::Result<Tensor> {
        Tensor::from_vec(vec![2u32, 3, 4, 0], (1, 4), device)
    }

    #[test]
    fn checkpoint_path_uses_name_and_tag() {
        let p = path(Path::new("models"), "sim_classifier", "latest");
        assert_eq!(
            p,
            Path::new("models").join("sim_classifier_latest.safetensors")
        );
    }

    #[test]
    fn save_then_load_reproduces_predictions() -> Result<(), Box<dyn Error>> {
        let device = Device::Cpu;
        let dir = tempfile::tempdir()?;
        let checkpoint_path = path(dir.path(), "sim_classifier", "latest");

        let trained = SiameseClassifier::new(VOCAB_SIZE, &device)?;
        save(trained.varmap(), &checkpoint_path)?;

        let mut restored = SiameseClassifier::new(VOCAB_SIZE, &device)?;
        load(restored.varmap_mut(), &checkpoint_path)?;

        let s1 = batch(&device)?;
        let s2 = Tensor::from_vec(vec![5u32, 6, 0, 0], (1, 4), &device)?;

        let expected = f32::try_from(trained.forward(&s1, &s2)?.get(0)?.squeeze(0)?)?;
        let actual = f32::try_from(restored.forward(&s1, &s2)?.get(0)?.squeeze(0)?)?;
        assert_eq!(expected, actual);
        Ok(())
    }

    #[test]
    fn load_fails_on_missing_file() -> Result<(), Box<dyn Error>> {
        let device = Device::Cpu;
        let dir = tempfile::tempdir()?;

        let mut classifier = SiameseClassifier::new(VOCAB_SIZE, &device)?;
        let missing = path(dir.path(), "sim_classifier", "latest");
        assert!(load(classifier.varmap_mut(), &missing).is_err());
        Ok(())
    }
}
