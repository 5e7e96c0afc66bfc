use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path, str::FromStr};
use strum_macros::{Display, EnumString};
use tracing::info;
use url::Url;

use crate::{
    error::{ConfigError, PayloadError},
    icon_rpc::{contracts::Contract, payload::DEFAULT_STEP_LIMIT},
};

/// ICON networks the exchange is deployed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Network {
    #[default]
    Mainnet,
    Yeouido,
    Sejong,
}

/// Kind of object a tracker link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerLink {
    Transaction,
    Token,
    Address,
    Block,
}

impl Network {
    pub fn nid(self) -> u32 {
        match self {
            Network::Mainnet => 1,
            Network::Yeouido => 3,
            Network::Sejong => 0x53,
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            Network::Mainnet => "https://ctz.solidwallet.io/api/v3",
            Network::Yeouido => "https://bicon.net.solidwallet.io/api/v3",
            Network::Sejong => "https://sejong.net.solidwallet.io/api/v3",
        }
    }

    pub fn tracker(self) -> &'static str {
        match self {
            Network::Mainnet => "https://tracker.icon.foundation",
            Network::Yeouido => "https://bicon.tracker.solidwallet.io",
            Network::Sejong => "https://sejong.tracker.solidwallet.io",
        }
    }

    pub fn tracker_link(self, data: &str, kind: TrackerLink) -> String {
        let prefix = self.tracker();
        match kind {
            TrackerLink::Transaction => format!("{prefix}/transaction/{data}"),
            TrackerLink::Token => format!("{prefix}/token/{data}"),
            TrackerLink::Block => format!("{prefix}/block/{data}"),
            TrackerLink::Address => format!("{prefix}/address/{data}"),
        }
    }
}

/// Deployed contract addresses, keyed by lowercase contract name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressBook(HashMap<Contract, String>);

impl AddressBook {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::AddressBookIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn with(mut self, contract: Contract, address: impl Into<String>) -> Self {
        self.0.insert(contract, address.into());
        self
    }

    pub fn get(&self, contract: Contract) -> Result<&str, PayloadError> {
        self.0
            .get(&contract)
            .map(String::as_str)
            .ok_or(PayloadError::MissingAddress(contract))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Runtime settings shared by the services
#[derive(Debug, Clone)]
pub struct Settings {
    pub network: Network,
    pub endpoint: Url,
    /// Active signing address, if a wallet is connected.
    pub account: Option<String>,
    pub step_limit: u64,
    pub addresses: AddressBook,
}

impl Settings {
    pub const NETWORK_VAR: &'static str = "BALANCED_NETWORK";
    pub const RPC_URL_VAR: &'static str = "BALANCED_RPC_URL";
    pub const ACCOUNT_VAR: &'static str = "BALANCED_ACCOUNT";
    pub const STEP_LIMIT_VAR: &'static str = "BALANCED_STEP_LIMIT";
    pub const ADDRESSES_VAR: &'static str = "BALANCED_ADDRESSES";

    pub fn new(network: Network) -> Result<Self, ConfigError> {
        Ok(Self {
            network,
            endpoint: parse_url(network.default_endpoint())?,
            account: None,
            step_limit: DEFAULT_STEP_LIMIT,
            addresses: AddressBook::default(),
        })
    }

    /// Reads settings from the process environment (after loading `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = match lookup(Self::NETWORK_VAR) {
            Some(name) => {
                Network::from_str(name.trim()).map_err(|_| ConfigError::UnknownNetwork(name))?
            }
            None => Network::default(),
        };

        let mut settings = Self::new(network)?;

        if let Some(url) = lookup(Self::RPC_URL_VAR) {
            settings.endpoint = parse_url(&url)?;
        }

        settings.account = lookup(Self::ACCOUNT_VAR).filter(|account| !account.is_empty());

        if let Some(limit) = lookup(Self::STEP_LIMIT_VAR) {
            settings.step_limit = limit
                .trim()
                .parse()
                .map_err(|_| ConfigError::StepLimit(limit))?;
        }

        if let Some(path) = lookup(Self::ADDRESSES_VAR) {
            settings.addresses = AddressBook::load(&path)?;
        }

        info!(
            network = %settings.network,
            endpoint = %settings.endpoint,
            contracts = settings.addresses.len(),
            "Loaded settings"
        );

        Ok(settings)
    }

    /// Sets the active account, keeping the current one when `account` is `None`.
    pub fn inject_account(&mut self, account: Option<String>) -> &mut Self {
        if let Some(account) = account {
            self.account = Some(account);
        }
        self
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::Url {
        url: url.to_string(),
        source,
    })
}
