use ethers::types::TxHash;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Wallet provider unavailable: {0}")]
    ProviderMissing(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("You have already voted")]
    AlreadyVoted,
    #[error("Another transaction is still pending")]
    ActionInFlight,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Contract call failed: {0}")]
    Contract(String),
    #[error("Transaction submission failed: {0}")]
    Transaction(String),
    #[error("Transaction {0:?} was dropped before confirmation")]
    NotConfirmed(TxHash),
    #[error("Transaction {0:?} reverted")]
    Reverted(TxHash),
    #[error("Pinning service error: {0}")]
    Pinning(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// How an error is surfaced to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Blocking banner, the session is unusable.
    Provider,
    /// Rejected locally, shown inline.
    Authorization,
    /// Rejected locally, shown inline.
    Validation,
    /// Transient notification.
    Network,
}

impl VoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoteError::ProviderMissing(_) => ErrorKind::Provider,
            VoteError::Unauthorized(_) => ErrorKind::Authorization,
            VoteError::Validation(_) | VoteError::AlreadyVoted | VoteError::InvalidAddress(_) => {
                ErrorKind::Validation
            }
            _ => ErrorKind::Network,
        }
    }

    /// True when the error was raised before anything left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Authorization | ErrorKind::Validation
        ) || matches!(self, VoteError::ActionInFlight)
    }
}
