use std::collections::HashMap;

use protocol::{ModelShape, TrainingMetadata};

use crate::error::{CoordErr, Result};

/// One client's pending update for the current round.
#[derive(Debug, Clone)]
pub struct Contribution {
    pub update: Vec<f32>,
    pub metadata: TrainingMetadata,
    /// The round the client believed was current when it uploaded.
    pub submitted_round: u64,
}

/// Outcome of recording a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Accepted,
    /// The client already had a pending contribution this round; the new
    /// one replaces it, it is never counted twice.
    Replaced,
}

/// The authoritative mutable record of the current round.
///
/// Created lazily on the first successful join and alive for the process
/// lifetime. All access goes through the coordinator's single lock; this
/// type itself holds no synchronization.
#[derive(Debug)]
pub struct RoundRecord {
    round_id: u64,
    shape: ModelShape,
    global: Vec<f32>,
    pending: HashMap<String, Contribution>,
}

impl RoundRecord {
    /// Creates the record for round 1 with a freshly initialized global
    /// vector.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `global` does not fit `shape`.
    pub fn new(shape: ModelShape, global: Vec<f32>) -> Result<Self> {
        if global.len() != shape.total_len() {
            return Err(CoordErr::LengthMismatch {
                got: global.len(),
                expected: shape.total_len(),
            });
        }

        Ok(Self {
            round_id: 1,
            shape,
            global,
            pending: HashMap::new(),
        })
    }

    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    pub fn shape(&self) -> &ModelShape {
        &self.shape
    }

    pub fn global(&self) -> &[f32] {
        &self.global
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Records one client's update for this round.
    ///
    /// A second submit from the same client before aggregation replaces its
    /// previous contribution.
    ///
    /// # Errors
    /// Returns `LengthMismatch` (leaving the pending set untouched) when the
    /// update's length disagrees with the model shape.
    pub fn submit(
        &mut self,
        client_id: String,
        update: Vec<f32>,
        metadata: TrainingMetadata,
        submitted_round: u64,
    ) -> Result<Submission> {
        if update.len() != self.shape.total_len() {
            return Err(CoordErr::LengthMismatch {
                got: update.len(),
                expected: self.shape.total_len(),
            });
        }

        let contribution = Contribution {
            update,
            metadata,
            submitted_round,
        };

        match self.pending.insert(client_id, contribution) {
            Some(_) => Ok(Submission::Replaced),
            None => Ok(Submission::Accepted),
        }
    }

    /// Iterates the pending updates in no particular order.
    pub fn updates(&self) -> impl Iterator<Item = &[f32]> {
        self.pending.values().map(|c| c.update.as_slice())
    }

    /// Installs the aggregated vector and opens the next round.
    ///
    /// The new vector must already fit the shape; callers compute it from
    /// the pending updates, which all passed the submit length check.
    pub(crate) fn advance(&mut self, new_global: Vec<f32>) {
        debug_assert_eq!(new_global.len(), self.shape.total_len());

        self.global = new_global;
        self.round_id += 1;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    fn metadata() -> TrainingMetadata {
        TrainingMetadata {
            accuracy: 0.9,
            training_time_secs: 1.0,
            epochs: 10,
        }
    }

    fn record(input_size: usize) -> RoundRecord {
        let shape = ModelShape::logistic_regression(NonZeroUsize::new(input_size).unwrap());
        let global = vec![0.0; shape.total_len()];
        RoundRecord::new(shape, global).unwrap()
    }

    #[test]
    fn new_rejects_wrong_global_length() {
        let shape = ModelShape::logistic_regression(NonZeroUsize::new(2).unwrap());

        let err = RoundRecord::new(shape, vec![0.0; 2]).unwrap_err();
        assert_eq!(err, CoordErr::LengthMismatch { got: 2, expected: 3 });
    }

    #[test]
    fn submit_wrong_length_leaves_pending_unchanged() {
        let mut record = record(2);

        let err = record
            .submit("a".to_string(), vec![1.0], metadata(), 1)
            .unwrap_err();

        assert_eq!(err, CoordErr::LengthMismatch { got: 1, expected: 3 });
        assert_eq!(record.pending_len(), 0);
    }

    #[test]
    fn resubmit_replaces_not_appends() {
        let mut record = record(2);

        let first = record
            .submit("a".to_string(), vec![1.0, 1.0, 1.0], metadata(), 1)
            .unwrap();
        assert_eq!(first, Submission::Accepted);

        let second = record
            .submit("a".to_string(), vec![2.0, 2.0, 2.0], metadata(), 1)
            .unwrap();
        assert_eq!(second, Submission::Replaced);

        assert_eq!(record.pending_len(), 1);
        assert_eq!(record.updates().next().unwrap(), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn advance_clears_pending_and_increments_round() {
        let mut record = record(2);
        record
            .submit("a".to_string(), vec![1.0, 1.0, 1.0], metadata(), 1)
            .unwrap();

        record.advance(vec![1.0, 1.0, 1.0]);

        assert_eq!(record.round_id(), 2);
        assert_eq!(record.pending_len(), 0);
        assert_eq!(record.global(), [1.0, 1.0, 1.0]);
    }
}
