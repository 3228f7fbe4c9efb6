use std::sync::{Mutex, MutexGuard};

use ethers::types::{Address, TxHash};

use crate::{
    contract::{Confirmation, Mutation, VotingContract},
    errors::VoteError,
    Result,
};

/// Where the current (or last) mutation stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum MutationState {
    #[default]
    Idle,
    Submitting {
        method: &'static str,
    },
    AwaitingConfirmation {
        method: &'static str,
        tx_hash: TxHash,
    },
    Succeeded {
        method: &'static str,
        tx_hash: TxHash,
    },
    Failed {
        method: &'static str,
        reason: String,
    },
}

impl MutationState {
    /// Action controls stay disabled while this holds.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            MutationState::Submitting { .. } | MutationState::AwaitingConfirmation { .. }
        )
    }
}

/// Submits one contract mutation at a time and waits for it to confirm.
#[derive(Default)]
pub struct Dispatcher {
    state: Mutex<MutationState>,
}

impl Dispatcher {
    fn lock(&self) -> MutexGuard<'_, MutationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> MutationState {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    /// Return to `Idle` once the outcome has been shown.
    pub fn acknowledge(&self) {
        let mut state = self.lock();
        if !state.is_busy() {
            *state = MutationState::Idle;
        }
    }

    pub async fn dispatch<C: VotingContract + ?Sized>(
        &self,
        contract: &C,
        from: Address,
        is_admin: bool,
        mutation: Mutation,
    ) -> Result<Confirmation> {
        let method = mutation.method();
        {
            let mut state = self.lock();
            if state.is_busy() {
                return Err(VoteError::ActionInFlight);
            }
            if mutation.requires_admin() && !is_admin {
                return Err(VoteError::Unauthorized(format!(
                    "Only admin can call {}",
                    method
                )));
            }
            *state = MutationState::Submitting { method };
        }
        let mut flight = InFlight {
            dispatcher: self,
            method,
            done: false,
        };

        log::info!("Submitting {} (gas limit {})", method, mutation.gas_limit());
        let result = self.submit_and_confirm(contract, from, &mutation).await;
        flight.done = true;
        match &result {
            Ok(confirmation) => {
                log::info!("{} confirmed in {:?}", method, confirmation.tx_hash);
                *self.lock() = MutationState::Succeeded {
                    method,
                    tx_hash: confirmation.tx_hash,
                };
            }
            Err(e) => {
                log::error!("{} failed: {}", method, e);
                *self.lock() = MutationState::Failed {
                    method,
                    reason: e.to_string(),
                };
            }
        }
        result
    }

    async fn submit_and_confirm<C: VotingContract + ?Sized>(
        &self,
        contract: &C,
        from: Address,
        mutation: &Mutation,
    ) -> Result<Confirmation> {
        let tx_hash = contract.submit(from, mutation).await?;
        *self.lock() = MutationState::AwaitingConfirmation {
            method: mutation.method(),
            tx_hash,
        };
        contract.confirm(tx_hash).await
    }
}

// Releases the busy state if the dispatch future is dropped mid-flight. The
// transaction itself may still land.
struct InFlight<'a> {
    dispatcher: &'a Dispatcher,
    method: &'static str,
    done: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            log::warn!("{} abandoned before confirmation", self.method);
            *self.dispatcher.lock() = MutationState::Failed {
                method: self.method,
                reason: "abandoned before confirmation".to_string(),
            };
        }
    }
}
