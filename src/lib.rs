use std::str::FromStr;

use ethers::types::Address;

pub mod config;
pub mod contract;
pub mod dapp;
pub mod dispatch;
pub mod download;
pub mod election;
pub mod errors;
pub mod net;
pub mod pinning;
pub mod session;
pub mod validate;
pub mod view;

#[cfg(test)]
mod mock;

pub use config::Config;
pub use contract::{Confirmation, Mutation, VotingContract};
pub use dapp::VotingDapp;
pub use download::load_election_and_candidates;
pub use election::{Candidate, Election, ElectionSnapshot, Winner};
pub use errors::VoteError;
pub use net::EthVotingContract;
pub use pinning::{gateway_url, PinataClient, PinningService};
pub use session::{connect, Session};

pub type Result<T> = std::result::Result<T, VoteError>;

lazy_static::lazy_static! {
    pub static ref ADMIN_ADDRESS: Address =
        Address::from_str("0x4F7E7fDD48154aedc2E472F4706fEc3f75f1F7f9").unwrap();
    pub static ref CONTRACT_ADDRESS: Address =
        Address::from_str("0xCa89Df34B2D4F6B5B75590f978D7D7e85915ef7F").unwrap();
}
