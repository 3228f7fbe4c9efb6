use std::str::FromStr;

use ethers::types::Address;

use crate::{errors::VoteError, Result, ADMIN_ADDRESS, CONTRACT_ADDRESS};

pub const PINATA_API_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
pub const PINATA_GATEWAY: &str = "gateway.pinata.cloud";

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: Option<String>,
    pub account: Option<Address>,
    pub contract_address: Address,
    pub admin_address: Address,
    pub pinata_jwt: Option<String>,
    pub pinata_gateway: String,
    pub pinata_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: None,
            account: None,
            contract_address: *CONTRACT_ADDRESS,
            admin_address: *ADMIN_ADDRESS,
            pinata_jwt: None,
            pinata_gateway: PINATA_GATEWAY.to_string(),
            pinata_api_url: PINATA_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Read the configuration from the process environment, after loading
    /// `.env` if there is one.
    pub fn from_env() -> Result<Config> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Config> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Config::default();
        config.rpc_url = var("RPC_URL");
        if let Some(account) = var("WALLET_ACCOUNT") {
            config.account = Some(parse_address(&account)?);
        }
        if let Some(contract) = var("CONTRACT_ADDRESS") {
            config.contract_address = parse_address(&contract)?;
        }
        if let Some(admin) = var("ADMIN_ADDRESS") {
            config.admin_address = parse_address(&admin)?;
        }
        config.pinata_jwt = var("PINATA_JWT");
        if let Some(gateway) = var("PINATA_GATEWAY") {
            config.pinata_gateway = gateway;
        }
        if let Some(url) = var("PINATA_API_URL") {
            config.pinata_api_url = url;
        }
        Ok(config)
    }
}

pub fn parse_address(s: &str) -> Result<Address> {
    Address::from_str(s.trim()).map_err(|_| VoteError::InvalidAddress(s.to_string()))
}
