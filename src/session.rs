use ethers::types::Address;

use crate::{
    config::Config,
    contract::VotingContract,
    errors::VoteError,
    net::{connect_provider, request_accounts, EthVotingContract},
    Result,
};

/// A connected wallet account and the contract client bound to it.
pub struct Session<C> {
    pub address: Address,
    pub is_admin: bool,
    pub contract: C,
}

impl<C: VotingContract> Session<C> {
    pub fn new(address: Address, admin: Address, contract: C) -> Self {
        Session {
            address,
            is_admin: address == admin,
            contract,
        }
    }

    pub fn require_admin(&self, message: &str) -> Result<()> {
        if !self.is_admin {
            return Err(VoteError::Unauthorized(message.to_string()));
        }
        Ok(())
    }
}

/// Request an account from the wallet provider and bind the contract client
pub async fn connect(config: &Config) -> Result<Session<EthVotingContract>> {
    let rpc_url = config.rpc_url.as_deref().ok_or_else(|| {
        VoteError::ProviderMissing("no wallet provider configured, set RPC_URL".into())
    })?;
    let provider = connect_provider(rpc_url)?;
    let accounts = request_accounts(&provider).await?;
    let address = pick_account(&accounts, config.account)?;
    log::info!("Connected address: {:?}", address);
    log::info!("Contract address: {:?}", config.contract_address);

    let contract = EthVotingContract::new(config.contract_address, provider);
    Ok(Session::new(address, config.admin_address, contract))
}

fn pick_account(accounts: &[Address], preferred: Option<Address>) -> Result<Address> {
    match preferred {
        Some(preferred) if accounts.contains(&preferred) => Ok(preferred),
        Some(preferred) => Err(VoteError::ProviderMissing(format!(
            "wallet does not expose account {:?}",
            preferred
        ))),
        None => accounts
            .first()
            .copied()
            .ok_or_else(|| VoteError::ProviderMissing("wallet exposed no accounts".into())),
    }
}
