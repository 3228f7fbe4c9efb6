use ethers::types::Address;

use crate::{
    contract::VotingContract,
    election::{Election, ElectionSnapshot},
    errors::VoteError,
    Result,
};

/// Ceiling on `candidatesCount`; each candidate costs one call.
pub const MAX_CANDIDATES: u64 = 10_000;

/// One read cycle against the contract. Candidates that fail to load are
/// skipped and reported in `failed_ids`; the election and count getters
/// failing aborts the whole cycle.
pub async fn load_election_and_candidates<C: VotingContract + ?Sized>(
    contract: &C,
    voter: Option<Address>,
) -> Result<ElectionSnapshot> {
    let election = load_election(contract).await.map_err(aggregate_failure)?;
    let count = contract
        .candidates_count()
        .await
        .map_err(aggregate_failure)?;
    log::info!("Candidates count: {}", count);
    if count > MAX_CANDIDATES {
        return Err(aggregate_failure(VoteError::Contract(format!(
            "candidate count {} exceeds {}",
            count, MAX_CANDIDATES
        ))));
    }

    let mut snapshot = ElectionSnapshot {
        election,
        ..Default::default()
    };
    for id in 1..=count {
        match contract.get_candidate(id).await {
            Ok(candidate) => snapshot.candidates.push(candidate),
            Err(e) => {
                log::error!("Error fetching candidate {}: {}", id, e);
                snapshot.failed_ids.push(id);
            }
        }
    }

    if let Some(voter) = voter {
        snapshot.has_voted = match contract.has_user_voted(voter).await {
            Ok(voted) => voted,
            Err(e) => {
                log::error!("Error checking vote status: {}", e);
                false
            }
        };
    }
    Ok(snapshot)
}

async fn load_election<C: VotingContract + ?Sized>(contract: &C) -> Result<Election> {
    let is_active = contract.is_election_active().await?;
    let title = if is_active {
        contract.election_title().await?
    } else {
        String::new()
    };
    Ok(Election { title, is_active })
}

fn aggregate_failure(e: VoteError) -> VoteError {
    log::error!("Error fetching candidates: {}", e);
    VoteError::Contract(format!("Failed to fetch candidates ({})", e))
}
