use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{ClientErr, Result};

/// In-memory training samples: one feature row per target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub features: Vec<Vec<f32>>,
    pub targets: Vec<f32>,
}

impl Dataset {
    /// Loads a dataset from a JSON file of the form
    /// `{"features": [[...], ...], "targets": [...]}`.
    ///
    /// # Errors
    /// Fails on io/parse errors, on an empty dataset, and when rows and
    /// targets disagree in count.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let dataset: Dataset = serde_json::from_str(&json)?;

        if dataset.features.is_empty() {
            return Err(ClientErr::EmptyDataset);
        }
        if dataset.features.len() != dataset.targets.len() {
            return Err(ClientErr::SampleCountMismatch {
                rows: dataset.features.len(),
                targets: dataset.targets.len(),
            });
        }

        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
