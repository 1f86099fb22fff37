//! Built-in baseline trainer: binary logistic regression with mini-batch
//! SGD.
//!
//! Only the logistic regression shape is trainable in-process; other model
//! kinds come from external trainers behind the same [`LocalTrainer`] seam.

use std::time::Instant;

use log::debug;
use protocol::{Contract, ModelKind, TrainingMetadata};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    data::Dataset,
    error::{ClientErr, Result},
    trainer::{LocalTrainer, TrainingOutcome},
};

/// Mini-batch SGD over the sigmoid log-likelihood.
pub struct LogisticSgd {
    rng: StdRng,
}

impl LogisticSgd {
    /// Creates a trainer, optionally seeded for deterministic shuffling.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self { rng }
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}

fn predict(beta: &[f32], beta_0: f32, row: &[f32]) -> f32 {
    let z: f32 = beta.iter().zip(row).map(|(b, x)| b * x).sum::<f32>() + beta_0;
    sigmoid(z)
}

impl LocalTrainer for LogisticSgd {
    fn train(&mut self, contract: &Contract, dataset: &Dataset) -> Result<TrainingOutcome> {
        if contract.model.kind != ModelKind::LogisticRegression {
            return Err(ClientErr::UnsupportedModel(format!(
                "{:?}",
                contract.model.kind
            )));
        }
        if dataset.is_empty() {
            return Err(ClientErr::EmptyDataset);
        }

        // Flat layout: [beta (input), beta_0 (1)].
        let blocks = protocol::reconstruct(&contract.global_vector, &contract.model)?;
        let mut beta = blocks[0].clone();
        let mut beta_0 = blocks[1][0];

        let width = dataset.features[0].len();
        if width != beta.len() {
            return Err(ClientErr::FeatureWidthMismatch {
                got: width,
                expected: beta.len(),
            });
        }

        let hp = contract.hyperparameters;
        let start = Instant::now();
        let mut indices: Vec<usize> = (0..dataset.len()).collect();

        for epoch in 0..hp.epochs {
            indices.shuffle(&mut self.rng);

            for batch in indices.chunks(hp.batch_size.max(1)) {
                let mut grad_beta = vec![0.0; beta.len()];
                let mut grad_0 = 0.0;

                for &i in batch {
                    let row = &dataset.features[i];
                    let error = predict(&beta, beta_0, row) - dataset.targets[i];

                    for (g, x) in grad_beta.iter_mut().zip(row) {
                        *g += error * x;
                    }
                    grad_0 += error;
                }

                let n = batch.len() as f32;
                for (b, g) in beta.iter_mut().zip(&grad_beta) {
                    *b -= hp.learning_rate * g / n;
                }
                beta_0 -= hp.learning_rate * grad_0 / n;
            }

            debug!(epoch = epoch + 1; "epoch finished");
        }

        let correct = dataset
            .features
            .iter()
            .zip(&dataset.targets)
            .filter(|(row, y)| {
                let label = if predict(&beta, beta_0, row) > 0.5 { 1.0 } else { 0.0 };
                label == **y
            })
            .count();
        let accuracy = correct as f32 / dataset.len() as f32;

        let update = protocol::flatten(&[beta, vec![beta_0]], &contract.model)?;

        Ok(TrainingOutcome {
            update,
            metadata: TrainingMetadata {
                accuracy,
                training_time_secs: start.elapsed().as_secs_f64(),
                epochs: hp.epochs,
            },
        })
    }
}
