//! In-memory stand-in for the deployed voting contract and the pinning
//! service. Follows the same rules the contract enforces and counts calls.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use ethers::types::{Address, TxHash, H160};
use tokio::sync::Semaphore;

use crate::{
    contract::{Confirmation, Mutation, VotingContract},
    election::{Candidate, Winner},
    errors::VoteError,
    pinning::PinningService,
    Result,
};

pub const ADMIN: Address = H160([0xAD; 20]);
pub const VOTER: Address = H160([0x0B; 20]);

#[derive(Default)]
struct State {
    admin: Address,
    active: bool,
    title: String,
    candidates: Vec<Candidate>,
    voters: HashSet<Address>,
    failing_ids: HashSet<u64>,
    fail_reads: bool,
    count_override: Option<u64>,
    fail_submit: bool,
    drop_confirmations: bool,
    pending: HashMap<TxHash, (Address, Mutation)>,
    submitted: Vec<(Address, Mutation)>,
    next_tx: u64,
    calls: HashMap<&'static str, usize>,
}

#[derive(Default)]
pub struct MockVotingContract {
    state: Mutex<State>,
    gate: Option<Arc<Semaphore>>,
}

impl MockVotingContract {
    pub fn new(admin: Address) -> Self {
        let contract = MockVotingContract::default();
        contract.lock().admin = admin;
        contract
    }

    pub fn with_candidates(admin: Address, names: &[&str]) -> Self {
        let contract = Self::new(admin);
        {
            let mut s = contract.lock();
            for name in names {
                let id = s.candidates.len() as u64 + 1;
                s.candidates.push(Candidate {
                    id,
                    name: name.to_string(),
                    age: 40,
                    party: "Independent".to_string(),
                    vote_count: 0,
                    image_url: format!("ipfs://CID{}", id),
                });
            }
        }
        contract
    }

    /// Confirmations block until `release` is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, name: &'static str) -> MutexGuard<'_, State> {
        let mut s = self.lock();
        *s.calls.entry(name).or_default() += 1;
        s
    }

    pub fn calls(&self, name: &str) -> usize {
        self.lock().calls.get(name).copied().unwrap_or_default()
    }

    pub fn submitted(&self) -> Vec<(Address, Mutation)> {
        self.lock().submitted.clone()
    }

    pub fn start(&self, title: &str) {
        let mut s = self.lock();
        s.active = true;
        s.title = title.to_string();
    }

    pub fn fail_candidate(&self, id: u64) {
        self.lock().failing_ids.insert(id);
    }

    pub fn fail_reads(&self) {
        self.lock().fail_reads = true;
    }

    pub fn override_count(&self, count: u64) {
        self.lock().count_override = Some(count);
    }

    pub fn fail_submit(&self) {
        self.lock().fail_submit = true;
    }

    pub fn drop_confirmations(&self) {
        self.lock().drop_confirmations = true;
    }

    pub fn vote_count(&self, id: u64) -> u64 {
        self.lock()
            .candidates
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.vote_count)
            .unwrap_or_default()
    }
}

fn apply(s: &mut State, from: Address, mutation: Mutation) -> std::result::Result<(), String> {
    if mutation.requires_admin() && from != s.admin {
        return Err("caller is not the admin".into());
    }
    match mutation {
        Mutation::AddCandidate {
            name,
            age,
            party,
            image_url,
        } => {
            let id = s.candidates.len() as u64 + 1;
            s.candidates.push(Candidate {
                id,
                name,
                age,
                party,
                vote_count: 0,
                image_url,
            });
        }
        Mutation::StartElection { title } => {
            s.active = true;
            s.title = title;
        }
        Mutation::Vote { candidate_id } => {
            if !s.active {
                return Err("election is not active".into());
            }
            if !s.voters.insert(from) {
                return Err("already voted".into());
            }
            let c = s
                .candidates
                .iter_mut()
                .find(|c| c.id == candidate_id)
                .ok_or("no such candidate")?;
            c.vote_count += 1;
        }
        Mutation::EndVotingAndReset => {
            s.active = false;
            s.title.clear();
            s.candidates.clear();
            s.voters.clear();
        }
    }
    Ok(())
}

#[async_trait]
impl VotingContract for MockVotingContract {
    async fn is_election_active(&self) -> Result<bool> {
        let s = self.record("isElectionActive");
        if s.fail_reads {
            return Err(VoteError::Contract("connection reset".into()));
        }
        Ok(s.active)
    }

    async fn election_title(&self) -> Result<String> {
        Ok(self.record("electionTitle").title.clone())
    }

    async fn candidates_count(&self) -> Result<u64> {
        let s = self.record("candidatesCount");
        Ok(s.count_override.unwrap_or(s.candidates.len() as u64))
    }

    async fn get_candidate(&self, id: u64) -> Result<Candidate> {
        let s = self.record("getCandidate");
        if s.failing_ids.contains(&id) {
            return Err(VoteError::Contract(format!("candidate {} unreadable", id)));
        }
        let found = s.candidates.iter().find(|c| c.id == id).cloned();
        found.ok_or_else(|| VoteError::Contract("invalid candidate".into()))
    }

    async fn has_user_voted(&self, voter: Address) -> Result<bool> {
        Ok(self.record("hasUserVoted").voters.contains(&voter))
    }

    async fn get_winner(&self) -> Result<Winner> {
        let s = self.record("getWinner");
        let mut best: Option<&Candidate> = None;
        for c in s.candidates.iter() {
            if best.map_or(true, |b| c.vote_count > b.vote_count) {
                best = Some(c);
            }
        }
        best.map(|c| Winner {
            id: c.id,
            name: c.name.clone(),
            vote_count: c.vote_count,
            image_url: String::new(),
        })
        .ok_or_else(|| VoteError::Contract("no candidates".into()))
    }

    async fn submit(&self, from: Address, mutation: &Mutation) -> Result<TxHash> {
        let mut s = self.record("submit");
        if s.fail_submit {
            return Err(VoteError::Transaction("user rejected transaction".into()));
        }
        s.next_tx += 1;
        let tx_hash = TxHash::from_low_u64_be(s.next_tx);
        s.pending.insert(tx_hash, (from, mutation.clone()));
        s.submitted.push((from, mutation.clone()));
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmation> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let mut s = self.record("confirm");
        if s.drop_confirmations {
            return Err(VoteError::NotConfirmed(tx_hash));
        }
        let (from, mutation) = s
            .pending
            .remove(&tx_hash)
            .ok_or(VoteError::NotConfirmed(tx_hash))?;
        apply(&mut s, from, mutation).map_err(|_| VoteError::Reverted(tx_hash))?;
        Ok(Confirmation {
            tx_hash,
            block_number: Some(s.next_tx),
        })
    }
}

/// Pinning service answering with a fixed content identifier.
pub struct MockPinning {
    pub cid: Option<String>,
    pub uploads: Mutex<Vec<(String, usize)>>,
}

impl MockPinning {
    pub fn returning(cid: &str) -> Self {
        MockPinning {
            cid: Some(cid.to_string()),
            uploads: Mutex::new(vec![]),
        }
    }

    pub fn failing() -> Self {
        MockPinning {
            cid: None,
            uploads: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl PinningService for MockPinning {
    async fn pin_file(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.len()));
        self.cid
            .clone()
            .ok_or_else(|| VoteError::Pinning("503 Service Unavailable".into()))
    }
}
