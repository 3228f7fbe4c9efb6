use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, PendingTransaction, Provider},
    types::{Address, TxHash, U256, U64},
};

use crate::{
    contract::{Confirmation, Mutation, VotingContract},
    election::{saturating_u64, Candidate, Winner},
    errors::VoteError,
    Result,
};

abigen!(VotingAbi, "./abi/Voting.json");

/// Connect to a wallet provider over JSON-RPC
pub fn connect_provider(url: &str) -> Result<Provider<Http>> {
    let provider = Provider::<Http>::try_from(url)
        .map_err(|e| VoteError::ProviderMissing(format!("{}: {}", url, e)))?;
    Ok(provider)
}

/// Ask the wallet for its accounts. Wallets that do not implement
/// `eth_requestAccounts` still answer `eth_accounts`.
pub async fn request_accounts(provider: &Provider<Http>) -> Result<Vec<Address>> {
    match provider
        .request::<_, Vec<Address>>("eth_requestAccounts", ())
        .await
    {
        Ok(accounts) => Ok(accounts),
        Err(e) => {
            log::debug!("eth_requestAccounts failed ({}), trying eth_accounts", e);
            provider
                .get_accounts()
                .await
                .map_err(|e| VoteError::ProviderMissing(e.to_string()))
        }
    }
}

fn contract_err<E: std::fmt::Display>(e: E) -> VoteError {
    VoteError::Contract(e.to_string())
}

/// Voting contract reached through an ethers provider.
pub struct EthVotingContract {
    provider: Arc<Provider<Http>>,
    contract: VotingAbi<Provider<Http>>,
}

impl EthVotingContract {
    pub fn new(address: Address, provider: Provider<Http>) -> Self {
        let provider = Arc::new(provider);
        let contract = VotingAbi::new(address, provider.clone());
        EthVotingContract { provider, contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }
}

#[async_trait]
impl VotingContract for EthVotingContract {
    async fn is_election_active(&self) -> Result<bool> {
        self.contract
            .is_election_active()
            .call()
            .await
            .map_err(contract_err)
    }

    async fn election_title(&self) -> Result<String> {
        self.contract.election_title().call().await.map_err(contract_err)
    }

    async fn candidates_count(&self) -> Result<u64> {
        let count = self
            .contract
            .candidates_count()
            .call()
            .await
            .map_err(contract_err)?;
        if count > U256::from(u64::MAX) {
            return Err(VoteError::Contract(format!(
                "candidate count {} out of range",
                count
            )));
        }
        Ok(count.as_u64())
    }

    async fn get_candidate(&self, id: u64) -> Result<Candidate> {
        let t = self
            .contract
            .get_candidate(U256::from(id))
            .call()
            .await
            .map_err(contract_err)?;
        Ok(Candidate::from_tuple(t))
    }

    async fn has_user_voted(&self, voter: Address) -> Result<bool> {
        self.contract
            .has_user_voted(voter)
            .call()
            .await
            .map_err(contract_err)
    }

    async fn get_winner(&self) -> Result<Winner> {
        let (id, name, vote_count) = self
            .contract
            .get_winner()
            .call()
            .await
            .map_err(contract_err)?;
        Ok(Winner {
            id: saturating_u64(id),
            name,
            vote_count: saturating_u64(vote_count),
            image_url: String::new(),
        })
    }

    async fn submit(&self, from: Address, mutation: &Mutation) -> Result<TxHash> {
        let call = match mutation {
            Mutation::AddCandidate {
                name,
                age,
                party,
                image_url,
            } => self.contract.add_candidate(
                name.clone(),
                U256::from(*age),
                party.clone(),
                image_url.clone(),
            ),
            Mutation::StartElection { title } => self.contract.start_election(title.clone()),
            Mutation::Vote { candidate_id } => self.contract.vote(U256::from(*candidate_id)),
            Mutation::EndVotingAndReset => self.contract.end_voting_and_reset(),
        };
        let call = call.from(from).gas(mutation.gas_limit());
        let pending = call
            .send()
            .await
            .map_err(|e| VoteError::Transaction(e.to_string()))?;
        Ok(*pending)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation> {
        let receipt = PendingTransaction::new(tx_hash, self.provider.as_ref())
            .confirmations(1)
            .await
            .map_err(|e| VoteError::Transaction(e.to_string()))?
            .ok_or(VoteError::NotConfirmed(tx_hash))?;
        if receipt.status == Some(U64::zero()) {
            return Err(VoteError::Reverted(tx_hash));
        }
        Ok(Confirmation {
            tx_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
        })
    }
}
