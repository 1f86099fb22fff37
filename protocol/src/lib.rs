pub mod codec;
pub mod error;
pub mod shape;
pub mod wire;

pub use codec::{flatten, reconstruct};
pub use error::CodecErr;
pub use shape::{GroupRole, ModelKind, ModelShape, ParamGroup};
pub use wire::{
    Columns, Contract, ErrorBody, Hyperparameters, JoinRequest, SyncRequest, TrainingMetadata,
    UploadAck, UploadRequest, ValidCodes,
};
