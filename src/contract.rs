use async_trait::async_trait;
use ethers::types::{Address, TxHash};

use crate::{
    election::{Candidate, Winner},
    Result,
};

pub const ADD_CANDIDATE_GAS: u64 = 500_000;
pub const DEFAULT_GAS: u64 = 200_000;

/// A state-changing contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    AddCandidate {
        name: String,
        age: u64,
        party: String,
        image_url: String,
    },
    StartElection {
        title: String,
    },
    Vote {
        candidate_id: u64,
    },
    EndVotingAndReset,
}

impl Mutation {
    pub fn gas_limit(&self) -> u64 {
        match self {
            Mutation::AddCandidate { .. } => ADD_CANDIDATE_GAS,
            _ => DEFAULT_GAS,
        }
    }

    pub fn requires_admin(&self) -> bool {
        !matches!(self, Mutation::Vote { .. })
    }

    pub fn method(&self) -> &'static str {
        match self {
            Mutation::AddCandidate { .. } => "addCandidate",
            Mutation::StartElection { .. } => "startElection",
            Mutation::Vote { .. } => "vote",
            Mutation::EndVotingAndReset => "endVotingAndReset",
        }
    }
}

/// Outcome of a confirmed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

/// The external interface of the deployed voting contract.
#[async_trait]
pub trait VotingContract: Send + Sync {
    async fn is_election_active(&self) -> Result<bool>;
    async fn election_title(&self) -> Result<String>;
    async fn candidates_count(&self) -> Result<u64>;
    async fn get_candidate(&self, id: u64) -> Result<Candidate>;
    async fn has_user_voted(&self, voter: Address) -> Result<bool>;
    /// `(id, name, voteCount)` of the current leader, image left empty.
    async fn get_winner(&self) -> Result<Winner>;

    /// Submit a transaction from `from`, returning as soon as it has a hash.
    async fn submit(&self, from: Address, mutation: &Mutation) -> Result<TxHash>;
    /// Block until the transaction has one confirmation.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_and_roles() {
        let add = Mutation::AddCandidate {
            name: "Alice".into(),
            age: 30,
            party: "X".into(),
            image_url: "ipfs://CID1".into(),
        };
        assert_eq!(add.gas_limit(), 500_000);
        assert!(add.requires_admin());
        let vote = Mutation::Vote { candidate_id: 1 };
        assert_eq!(vote.gas_limit(), 200_000);
        assert!(!vote.requires_admin());
        assert!(Mutation::EndVotingAndReset.requires_admin());
        assert_eq!(Mutation::EndVotingAndReset.method(), "endVotingAndReset");
    }
}
