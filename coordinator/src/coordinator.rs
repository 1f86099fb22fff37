use log::{debug, info, warn};
use parking_lot::Mutex;
use protocol::{Contract, UploadAck, UploadRequest};

use crate::{
    aggregate::{AggregationEngine, Strategy},
    codes::JoinCodes,
    config::CoordinatorConfig,
    error::{CoordErr, Result},
    init,
    round::{RoundRecord, Submission},
};

/// The service-facing orchestrator for join, sync and upload.
///
/// Every operation that reads or writes the round record runs under one
/// exclusive lock, held only for in-memory work. Upload is submit plus
/// conditional aggregation inside a single lock scope, so two concurrent
/// uploads can never both observe quorum-not-reached, and a duplicate
/// upload can never be double-counted.
pub struct RoundCoordinator {
    config: CoordinatorConfig,
    codes: JoinCodes,
    engine: AggregationEngine,
    record: Mutex<Option<RoundRecord>>,
}

impl RoundCoordinator {
    /// Creates a coordinator with the default allow-list.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self::with_codes(config, JoinCodes::default())
    }

    /// Creates a coordinator with an explicit join-code allow-list.
    pub fn with_codes(config: CoordinatorConfig, codes: JoinCodes) -> Self {
        let engine = AggregationEngine::new(config.quorum, Strategy::FedAvg);

        Self {
            config,
            codes,
            engine,
            record: Mutex::new(None),
        }
    }

    /// Validates the join code and returns the current contract,
    /// initializing the round on the first-ever join.
    ///
    /// # Errors
    /// Returns `InvalidJoinCode` when the code is not on the allow-list.
    pub fn join(&self, join_code: &str, client_identity: &str) -> Result<Contract> {
        if !self.codes.is_valid(join_code) {
            return Err(CoordErr::InvalidJoinCode);
        }

        let mut guard = self.record.lock();
        if guard.is_none() {
            let shape = self.config.model.clone();
            let global = init::initial_global(&shape, self.config.seed);
            info!(
                params = shape.total_len(),
                quorum = self.engine.quorum();
                "first join, initialized round 1"
            );
            *guard = Some(RoundRecord::new(shape, global)?);
        }

        // Cannot be None past the block above.
        let record = guard.as_ref().ok_or(CoordErr::RoundNotStarted)?;

        info!(client = client_identity, round = record.round_id(); "client joined");
        Ok(self.contract_of(record))
    }

    /// Returns the current contract without mutating any state.
    ///
    /// # Errors
    /// Returns `InvalidJoinCode` for unknown codes and `RoundNotStarted`
    /// before the first join.
    pub fn sync(&self, join_code: &str) -> Result<Contract> {
        if !self.codes.is_valid(join_code) {
            return Err(CoordErr::InvalidJoinCode);
        }

        let guard = self.record.lock();
        let record = guard.as_ref().ok_or(CoordErr::RoundNotStarted)?;

        debug!(round = record.round_id(); "contract synced");
        Ok(self.contract_of(record))
    }

    /// Records a contribution and aggregates if quorum is reached, as one
    /// atomic unit.
    ///
    /// The ack carries the coordinator's present round id, which may already
    /// have advanced past the caller's; callers must treat the ack's round,
    /// not their request's, as authoritative. Uploads naming an older round
    /// are accepted into the current round.
    ///
    /// # Errors
    /// Returns `RoundNotStarted` before the first join and `LengthMismatch`
    /// when the update does not fit the model shape; neither mutates the
    /// pending set.
    pub fn upload(&self, request: UploadRequest) -> Result<UploadAck> {
        let UploadRequest {
            client_id,
            round_id,
            model_update,
            training_metadata,
        } = request;

        let mut guard = self.record.lock();
        let record = guard.as_mut().ok_or(CoordErr::RoundNotStarted)?;

        if round_id != record.round_id() {
            warn!(
                client = client_id.as_str(),
                claimed = round_id,
                current = record.round_id();
                "stale-round upload accepted into current round"
            );
        }

        let submission = record.submit(client_id.clone(), model_update, training_metadata, round_id)?;
        if submission == Submission::Replaced {
            info!(client = client_id.as_str(); "replaced pending contribution");
        }

        if self.engine.aggregate_if_ready(record) {
            info!(
                round = record.round_id(),
                strategy = self.engine.strategy().name();
                "quorum reached, advanced round"
            );
        }

        Ok(UploadAck::received(record.round_id()))
    }

    /// The join-code allow-list, for the diagnostic listing endpoint.
    pub fn valid_codes(&self) -> Vec<String> {
        self.codes.list().to_vec()
    }

    fn contract_of(&self, record: &RoundRecord) -> Contract {
        Contract {
            round_id: record.round_id(),
            model: record.shape().clone(),
            hyperparameters: self.config.hyperparameters,
            columns: self.config.columns.clone(),
            global_vector: record.global().to_vec(),
        }
    }
}
