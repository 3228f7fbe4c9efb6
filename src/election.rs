use ethers::types::U256;
use serde::Serialize;

use crate::pinning::gateway_url;

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub id: u64,
    pub name: String,
    pub age: u64,
    pub party: String,
    pub vote_count: u64,
    pub image_url: String,
}

impl Candidate {
    /// Build from the `getCandidate` tuple `(id, name, voteCount, imageUrl, age, party)`.
    pub fn from_tuple(t: (U256, String, U256, String, U256, String)) -> Self {
        let (id, name, vote_count, image_url, age, party) = t;
        Candidate {
            id: saturating_u64(id),
            name,
            age: saturating_u64(age),
            party,
            vote_count: saturating_u64(vote_count),
            image_url,
        }
    }

    pub fn image_link(&self, gateway: &str) -> String {
        gateway_url(&self.image_url, gateway)
    }
}

#[derive(Clone, Serialize, Default, Debug, PartialEq, Eq)]
pub struct Election {
    pub title: String,
    pub is_active: bool,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct Winner {
    pub id: u64,
    pub name: String,
    pub vote_count: u64,
    pub image_url: String,
}

/// Everything one read cycle learned from the contract.
#[derive(Clone, Default, Debug)]
pub struct ElectionSnapshot {
    pub election: Election,
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
    pub failed_ids: Vec<u64>,
}

impl ElectionSnapshot {
    pub fn candidate(&self, id: u64) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn total_votes(&self) -> u64 {
        self.candidates.iter().map(|c| c.vote_count).sum()
    }

    /// Highest vote count, first registered wins ties.
    pub fn leader(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .fold(None, |best: Option<&Candidate>, c| match best {
                Some(b) if b.vote_count >= c.vote_count => Some(b),
                _ => Some(c),
            })
    }
}

pub(crate) fn saturating_u64(v: U256) -> u64 {
    if v > U256::from(u64::MAX) {
        u64::MAX
    } else {
        v.as_u64()
    }
}
