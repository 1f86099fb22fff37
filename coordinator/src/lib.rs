pub mod aggregate;
pub mod codes;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod init;
pub mod round;

pub use coordinator::RoundCoordinator;
pub use error::{CoordErr, Result};
