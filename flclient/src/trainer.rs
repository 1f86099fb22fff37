//! The seam between round coordination and the local training algorithm.
//!
//! The session only needs a producer of a flat update vector matching the
//! contract's shape; how that vector is computed is the trainer's business.

use protocol::{Contract, TrainingMetadata};

use crate::{data::Dataset, error::Result};

/// The product of one local training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// Flat update vector, laid out by the contract's model shape.
    pub update: Vec<f32>,
    pub metadata: TrainingMetadata,
}

/// Produces a model update from the contract's hyperparameters and current
/// global vector.
pub trait LocalTrainer {
    /// Trains locally, starting from the contract's global vector.
    ///
    /// # Errors
    /// Implementations fail when the contract's model kind or the dataset
    /// does not fit them; the session halts without touching persisted
    /// state.
    fn train(&mut self, contract: &Contract, dataset: &Dataset) -> Result<TrainingOutcome>;
}
