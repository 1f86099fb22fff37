pub mod api;
pub mod data;
pub mod error;
pub mod session;
pub mod sgd;
pub mod store;
pub mod trainer;

pub use api::ServerApi;
pub use error::{ClientErr, Result};
pub use session::{ClientSession, Phase};
pub use store::SessionStore;
pub use trainer::{LocalTrainer, TrainingOutcome};
