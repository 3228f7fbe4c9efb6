use std::fmt::Write;

use ethers::types::{Address, TxHash};
use serde::Serialize;

use crate::{
    election::{Candidate, Election, ElectionSnapshot, Winner},
    errors::{ErrorKind, VoteError},
    pinning::gateway_url,
    validate::CandidateForm,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Loading,
    Success,
    Error,
}

/// A transient notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Local view state of one session. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct VotingView {
    pub address: Option<Address>,
    pub is_admin: bool,
    pub election: Election,
    pub candidates: Vec<Candidate>,
    pub has_voted: bool,
    /// Blocking banner, set when the wallet or the read path is unusable.
    pub banner: Option<String>,
    /// Inline status line of the registration form.
    pub status: Option<String>,
    pub form: CandidateForm,
    pub winner: Option<Winner>,
    pub notices: Vec<Notice>,
}

impl VotingView {
    pub fn connected(address: Address, is_admin: bool) -> Self {
        VotingView {
            address: Some(address),
            is_admin,
            ..Default::default()
        }
    }

    pub fn disconnected(error: &VoteError) -> Self {
        VotingView {
            banner: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: ElectionSnapshot) {
        self.election = snapshot.election;
        self.candidates = snapshot.candidates;
        self.has_voted = snapshot.has_voted;
        self.banner = None;
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            NoticeLevel::Error => log::error!("{}", message),
            _ => log::info!("{}", message),
        }
        self.notices.push(Notice { level, message });
    }

    /// Surface an error the way its kind calls for.
    pub fn report(&mut self, error: &VoteError) {
        match error.kind() {
            ErrorKind::Provider => self.banner = Some(error.to_string()),
            ErrorKind::Authorization | ErrorKind::Validation => {
                self.status = Some(error.to_string())
            }
            ErrorKind::Network => self.notify(NoticeLevel::Error, error.to_string()),
        }
    }

    /// Withdraw every notice of `level`, as a spinner is once its work ends.
    pub fn dismiss(&mut self, level: NoticeLevel) {
        self.notices.retain(|n| n.level != level);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&StatusReport {
            address: self.address,
            is_admin: self.is_admin,
            election: &self.election,
            candidates: &self.candidates,
            has_voted: self.has_voted,
            winner: self.winner.as_ref(),
        })
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn can_vote(&self) -> bool {
        self.address.is_some() && !self.has_voted
    }

    pub fn render(&self, gateway: &str) -> String {
        let mut out = String::new();
        if let Some(banner) = &self.banner {
            let _ = writeln!(out, "Error: {}", banner);
            return out;
        }
        if let Some(address) = &self.address {
            let role = if self.is_admin { " (admin)" } else { "" };
            let _ = writeln!(out, "Connected: {}{}", short_address(address), role);
        }
        if self.election.is_active {
            let _ = writeln!(out, "Election: {} (active)", self.election.title);
        } else {
            let _ = writeln!(out, "No active election");
        }
        for c in self.candidates.iter() {
            let _ = writeln!(
                out,
                "#{} {} ({}), age {}: {} votes",
                c.id, c.name, c.party, c.age, c.vote_count
            );
            if !c.image_url.is_empty() {
                let _ = writeln!(out, "    {}", gateway_url(&c.image_url, gateway));
            }
        }
        if self.address.is_some() {
            let action = if self.has_voted { "Already Voted" } else { "Vote" };
            let _ = writeln!(out, "[{}]", action);
        }
        if let Some(w) = &self.winner {
            let _ = writeln!(out, "Election Winner: {} with {} votes", w.name, w.vote_count);
            if !w.image_url.is_empty() {
                let _ = writeln!(out, "    {}", gateway_url(&w.image_url, gateway));
            }
        }
        if let Some(status) = &self.status {
            let _ = writeln!(out, "{}", status);
        }
        out
    }
}

#[derive(Serialize)]
struct StatusReport<'a> {
    address: Option<Address>,
    is_admin: bool,
    election: &'a Election,
    candidates: &'a [Candidate],
    has_voted: bool,
    winner: Option<&'a Winner>,
}

/// `0x4F7E...F7f9` style abbreviation.
pub fn short_address(address: &Address) -> String {
    let full = format!("{:?}", address);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

pub fn short_hash(tx_hash: &TxHash) -> String {
    let h = hex::encode(tx_hash.as_bytes());
    format!("0x{}…{}", &h[..8], &h[h.len() - 6..])
}
