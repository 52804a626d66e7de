mod args;

use args::Args;
use candle_core::Device;
use chrono::Local;
use clap::Parser;
use corpus::load_similarity_corpus;
use estimator::checkpoint;
use estimator::evaluation::{EvalSummary, EvalTracker};
use estimator::samples::Samples;
use estimator::SiameseClassifier;
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const MODEL_NAME: &str = "sim_classifier";

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let corpus_path = args.data_dir.join(&args.corpus);
    log::info!("Loading similarity corpus from {:?}", corpus_path);
    let (vocab, pairs) = load_similarity_corpus(&corpus_path)?;
    log::info!(
        "Loaded {} sentence pairs ({} distinct words)",
        pairs.len(),
        vocab.n_words()
    );

    let device = Device::cuda_if_available(0)?;
    if device.is_cuda() {
        log::info!("Using CUDA");
    } else {
        log::info!("Using CPU");
    }

    let mut classifier = SiameseClassifier::new(vocab.n_words(), &device)?;
    let checkpoint_path = checkpoint::path(&args.save_dir, MODEL_NAME, &args.tag);
    log::info!("Loading checkpoint from {:?}", checkpoint_path);
    checkpoint::load(classifier.varmap_mut(), &checkpoint_path)?;

    // Set up SIGINT handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = Arc::clone(&stop_flag);

    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, stopping evaluation...");
        stop_flag_handler.store(true, Ordering::Relaxed);
    })?;

    let mut samples = Samples::new(pairs);
    samples.shuffle(args.seed);

    let loader = samples.to_batched(&vocab, args.max_sent_len, args.batch_size, &device);
    let mut tracker = EvalTracker::new(args.num_test_samples);

    'samples: for batch_res in loader {
        if tracker.is_done() || stop_flag.load(Ordering::Relaxed) {
            break;
        }

        let (s1, s2, labels) = batch_res?;
        let step = classifier.test_step(&s1, &s2, &labels)?;

        for row in 0..labels.dim(0)? {
            if tracker.is_done() {
                break 'samples;
            }

            let prediction = f32::try_from(step.predictions.get(row)?.squeeze(0)?)?;
            let label = f32::try_from(labels.get(row)?.squeeze(0)?)?;
            let divergence = (prediction - label).abs();

            let sentence_a = vocab.decode(&s1.get(row)?.to_vec1::<u32>()?);
            let sentence_b = vocab.decode(&s2.get(row)?.to_vec1::<u32>()?);

            let sample_idx = tracker.seen();
            tracker.record(divergence, step.loss);

            println!(
                "Sample: {}\n\
                 Sentence A: {}\n\
                 Sentence B: {}\n\
                 Prediction: {:.4}\n\
                 Ground truth: {:.4}\n\
                 Divergence: {:.4}\n\
                 Loss: {:.4}\n",
                sample_idx, sentence_a, sentence_b, prediction, label, divergence, step.loss
            );
        }
    }

    let summary = tracker.summary();
    println!(
        "=================================================\n\
         = Testing concluded after examining {} samples.\n\
         = Average classification divergence is {:.4}.\n\
         = Average classification loss (MSE) is {:.4}.\n\
         =================================================",
        summary.samples, summary.avg_divergence, summary.avg_loss
    );

    write_report(&args.save_dir, &summary)?;

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    Ok(args)
}

fn write_report(save_dir: &Path, summary: &EvalSummary) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(save_dir)?;

    let timestamp = Local::now().format("%Y-%m-%d-%H:%M");
    let report_path = save_dir.join(format!("evaluation-{}.txt", timestamp));

    let mut file = File::create(&report_path)?;
    writeln!(file, "Samples examined: {}", summary.samples)?;
    writeln!(file, "Average divergence: {:.4}", summary.avg_divergence)?;
    writeln!(file, "Average loss (MSE): {:.4}", summary.avg_loss)?;

    log::info!("Evaluation written to {}", report_path.display());
    Ok(())
}
