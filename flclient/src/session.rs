//! The client-side state machine driving join, sync, train and upload.

use std::fmt::{self, Display};

use log::{debug, info};
use protocol::{Contract, TrainingMetadata, UploadAck, UploadRequest};

use crate::{
    api::ServerApi,
    data::Dataset,
    error::{ClientErr, Result},
    store::{SessionStore, StoredContract, TrainingResult},
    trainer::LocalTrainer,
};

/// Where the session stands inside one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unjoined,
    Joined,
    ConfigSynced,
    Trained,
    Uploaded,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Unjoined => "unjoined",
            Phase::Joined => "joined",
            Phase::ConfigSynced => "config-synced",
            Phase::Trained => "trained",
            Phase::Uploaded => "uploaded",
        };
        f.write_str(s)
    }
}

/// One client's view of the round protocol.
///
/// Transitions: join takes any phase to `Joined`; sync takes any phase with
/// a known join code to `ConfigSynced`; train requires `Joined` or
/// `ConfigSynced`; upload requires `Trained`. Training again after an
/// upload therefore forces a fresh sync first, so the next local round
/// never starts from a pre-aggregation global vector.
///
/// The phase is rebuilt from the persisted files on construction, which is
/// what lets each CLI invocation pick up where the previous one stopped.
pub struct ClientSession {
    api: ServerApi,
    store: SessionStore,
    phase: Phase,
    join_code: Option<String>,
    client_id: Option<String>,
    contract: Option<Contract>,
}

impl ClientSession {
    /// Opens a session, restoring contract, identity and phase from the
    /// store.
    ///
    /// A persisted result counts as `Trained` only when it was produced for
    /// the persisted contract's round; a result left over from an earlier
    /// round restores as `Joined`, forcing a fresh train before upload.
    pub fn open(api: ServerApi, store: SessionStore) -> Result<Self> {
        let stored = store.load_contract()?;
        let result = store.load_result()?;

        let mut session = Self {
            api,
            store,
            phase: Phase::Unjoined,
            join_code: None,
            client_id: None,
            contract: None,
        };

        if let Some(StoredContract {
            join_code,
            client_id,
            contract,
        }) = stored
        {
            let trained = result
                .as_ref()
                .is_some_and(|r| r.round_id == contract.round_id);
            session.phase = if trained { Phase::Trained } else { Phase::Joined };
            session.join_code = Some(join_code);
            session.client_id = Some(client_id);
            session.contract = Some(contract);

            debug!(phase = session.phase.to_string().as_str(); "restored session from disk");
        }

        Ok(session)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    /// Joins a round and persists the received contract.
    pub async fn join(&mut self, join_code: &str, client_identity: &str) -> Result<&Contract> {
        let contract = self.api.join(join_code, client_identity).await?;
        info!(round = contract.round_id; "joined round");

        self.store.save_contract(&StoredContract {
            join_code: join_code.to_string(),
            client_id: client_identity.to_string(),
            contract: contract.clone(),
        })?;

        self.join_code = Some(join_code.to_string());
        self.client_id = Some(client_identity.to_string());
        self.phase = Phase::Joined;

        Ok(self.contract.insert(contract))
    }

    /// Refreshes the contract in place from the coordinator.
    ///
    /// # Errors
    /// Fails with `MissingJoinCode` if the session never joined.
    pub async fn sync(&mut self) -> Result<&Contract> {
        let join_code = self.join_code.clone().ok_or(ClientErr::MissingJoinCode)?;
        let client_id = self.client_id.clone().ok_or(ClientErr::MissingJoinCode)?;

        let contract = self.api.sync(&join_code).await?;
        info!(round = contract.round_id; "synced contract");

        self.store.save_contract(&StoredContract {
            join_code,
            client_id,
            contract: contract.clone(),
        })?;

        self.phase = Phase::ConfigSynced;

        Ok(self.contract.insert(contract))
    }

    /// Runs the local trainer against the current contract and persists the
    /// result for upload.
    ///
    /// # Errors
    /// Fails with `InvalidState` unless the session is `Joined` or
    /// `ConfigSynced`; a session that already uploaded must sync first so
    /// it trains from the post-aggregation vector.
    pub fn train(
        &mut self,
        trainer: &mut dyn LocalTrainer,
        dataset: &Dataset,
    ) -> Result<TrainingMetadata> {
        if !matches!(self.phase, Phase::Joined | Phase::ConfigSynced) {
            return Err(ClientErr::InvalidState {
                operation: "train",
                phase: self.phase,
            });
        }

        let contract = self.contract.as_ref().ok_or(ClientErr::MissingContract)?;
        let outcome = trainer.train(contract, dataset)?;

        if outcome.update.len() != contract.model.total_len() {
            return Err(ClientErr::Codec(protocol::CodecErr::ShapeMismatch {
                got: outcome.update.len(),
                expected: contract.model.total_len(),
            }));
        }

        let result = TrainingResult {
            round_id: contract.round_id,
            model_update: outcome.update,
            metadata: outcome.metadata,
        };
        self.store.save_result(&result)?;

        info!(
            round = result.round_id,
            accuracy = result.metadata.accuracy;
            "training finished"
        );
        self.phase = Phase::Trained;

        Ok(result.metadata)
    }

    /// Sends the persisted training result to the coordinator.
    ///
    /// # Errors
    /// Fails with `InvalidState` unless the session is `Trained`.
    pub async fn upload(&mut self) -> Result<UploadAck> {
        if self.phase != Phase::Trained {
            return Err(ClientErr::InvalidState {
                operation: "upload",
                phase: self.phase,
            });
        }

        let client_id = self.client_id.clone().ok_or(ClientErr::MissingJoinCode)?;
        let result = self.store.load_result()?.ok_or(ClientErr::MissingResult)?;

        let ack = self
            .api
            .upload(&UploadRequest {
                client_id,
                round_id: result.round_id,
                model_update: result.model_update,
                training_metadata: result.metadata,
            })
            .await?;

        if ack.current_round > result.round_id {
            info!(
                uploaded_for = result.round_id,
                current = ack.current_round;
                "round advanced, sync before training again"
            );
        }

        self.phase = Phase::Uploaded;
        Ok(ack)
    }
}
