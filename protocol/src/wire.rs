//! JSON bodies exchanged between the client and the coordinator.
//!
//! One request/response pair per endpoint. Clients never need to parse
//! anything beyond these shapes.

use serde::{Deserialize, Serialize};

use crate::shape::ModelShape;

/// Static training hyperparameters distributed with the contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub learning_rate: f32,
    pub epochs: usize,
    pub batch_size: usize,
}

/// Column names clients should feed into the local trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Columns {
    pub features: Vec<String>,
    pub target: String,
}

/// The read-only projection of the current round sent on join and sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub round_id: u64,
    pub model: ModelShape,
    pub hyperparameters: Hyperparameters,
    pub columns: Columns,
    pub global_vector: Vec<f32>,
}

/// Summary of one completed local training run, echoed back on upload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub accuracy: f32,
    pub training_time_secs: f64,
    pub epochs: usize,
}

/// `POST /join` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub join_code: String,
    pub client_identity: String,
}

/// `POST /sync` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    pub join_code: String,
}

/// `POST /upload` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub client_id: String,
    /// The round the client believes is current. The ack's `current_round`
    /// is authoritative, not this.
    pub round_id: u64,
    pub model_update: Vec<f32>,
    pub training_metadata: TrainingMetadata,
}

/// `POST /upload` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    pub status: String,
    pub current_round: u64,
}

impl UploadAck {
    pub fn received(current_round: u64) -> Self {
        Self {
            status: "received".to_string(),
            current_round,
        }
    }
}

/// `GET /codes` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidCodes {
    pub valid_codes: Vec<String>,
}

/// Structured error body returned on every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
