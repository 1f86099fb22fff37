//! On-disk persistence between client invocations.
//!
//! The last-received contract and the last-produced training result are the
//! client's sole durability mechanism; each command reads them back before
//! acting.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use protocol::{Contract, TrainingMetadata};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONTRACT_FILE: &str = "contract.json";
const RESULT_FILE: &str = "result.json";

/// The persisted contract plus the identity it was obtained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredContract {
    pub join_code: String,
    pub client_id: String,
    pub contract: Contract,
}

/// The persisted outcome of one local training run, uploaded later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub round_id: u64,
    pub model_update: Vec<f32>,
    pub metadata: TrainingMetadata,
}

/// Reads and writes the session files under one state directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save_contract(&self, stored: &StoredContract) -> Result<()> {
        self.write(CONTRACT_FILE, stored)
    }

    pub fn load_contract(&self) -> Result<Option<StoredContract>> {
        self.read(CONTRACT_FILE)
    }

    pub fn save_result(&self, result: &TrainingResult) -> Result<()> {
        self.write(RESULT_FILE, result)
    }

    pub fn load_result(&self) -> Result<Option<TrainingResult>> {
        self.read(RESULT_FILE)
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.path(file), json)?;
        Ok(())
    }

    fn read<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<Option<T>> {
        match fs::read_to_string(self.path(file)) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl AsRef<Path> for SessionStore {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}
