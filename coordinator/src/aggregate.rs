//! Round-closing policy and federated averaging.

use std::num::NonZeroUsize;

use crate::round::RoundRecord;

/// The supported aggregation strategies.
///
/// Only unweighted federated averaging is implemented: every contribution
/// counts equally regardless of the client's dataset size. Sample-size
/// weighted averaging and robust variants are extension points, not
/// silently swapped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    FedAvg,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::FedAvg => "fedavg",
        }
    }

    /// Combines the round's pending updates into the next global vector.
    fn combine(self, record: &RoundRecord) -> Vec<f32> {
        match self {
            Strategy::FedAvg => {
                let mut sum = vec![0.0; record.shape().total_len()];
                let mut count = 0usize;

                for update in record.updates() {
                    for (acc, x) in sum.iter_mut().zip(update) {
                        *acc += x;
                    }
                    count += 1;
                }

                let n = count as f32;
                for acc in &mut sum {
                    *acc /= n;
                }

                sum
            }
        }
    }
}

/// Decides when a round closes and computes the next global vector.
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine {
    quorum: NonZeroUsize,
    strategy: Strategy,
}

impl AggregationEngine {
    /// Creates an engine that closes a round once `quorum` distinct clients
    /// have contributed.
    pub fn new(quorum: NonZeroUsize, strategy: Strategy) -> Self {
        Self { quorum, strategy }
    }

    pub fn quorum(&self) -> usize {
        self.quorum.get()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Aggregates and advances the round if quorum has been reached.
    ///
    /// Either every contribution pending at the moment of the check is
    /// folded in, or none is. Callers hold the coordinator lock, so no
    /// update can land mid-aggregation.
    ///
    /// # Returns
    /// Whether an aggregation happened.
    pub fn aggregate_if_ready(&self, record: &mut RoundRecord) -> bool {
        if record.pending_len() < self.quorum.get() {
            return false;
        }

        let next_global = self.strategy.combine(record);
        record.advance(next_global);
        true
    }
}
