use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

use super::types::Params;
use crate::{error::PayloadError, types::CurrencyId};

/// Deployed contracts the client knows how to talk to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Contract {
    Dex,
    Staking,
    Loans,
    Rewards,
    Governance,
    #[strum(serialize = "sICX")]
    Sicx,
    #[strum(serialize = "bnUSD")]
    Bnusd,
    #[strum(serialize = "BALN")]
    Baln,
    #[strum(serialize = "OMM")]
    Omm,
    #[strum(serialize = "IUSDC")]
    Iusdc,
    #[strum(serialize = "USDS")]
    Usds,
    #[strum(serialize = "CFT")]
    Cft,
    #[strum(serialize = "METX")]
    Metx,
    #[strum(serialize = "IUSDT")]
    Iusdt,
}

impl Contract {
    pub fn is_token(self) -> bool {
        matches!(
            self,
            Contract::Sicx
                | Contract::Bnusd
                | Contract::Baln
                | Contract::Omm
                | Contract::Iusdc
                | Contract::Usds
                | Contract::Cft
                | Contract::Metx
                | Contract::Iusdt
        )
    }

    /// Token contract backing a currency key. `None` for ICX and unknown keys.
    ///
    /// Keys are case-sensitive so the contract always agrees with [`CurrencyId::decimals`].
    pub fn for_currency(currency: &CurrencyId) -> Option<Self> {
        Contract::from_str(currency.as_str())
            .ok()
            .filter(|contract| contract.is_token())
    }

    pub fn methods(self) -> &'static [MethodSchema] {
        match self {
            Contract::Dex => DEX_METHODS,
            Contract::Staking => STAKING_METHODS,
            Contract::Loans => LOANS_METHODS,
            Contract::Rewards => REWARDS_METHODS,
            Contract::Governance => GOVERNANCE_METHODS,
            _ => IRC2_METHODS,
        }
    }

    pub fn method(self, name: &str) -> Result<&'static MethodSchema, PayloadError> {
        self.methods()
            .iter()
            .find(|schema| schema.name == name)
            .ok_or_else(|| PayloadError::UnknownMethod {
                contract: self,
                method: name.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    Address,
    Int,
    Bool,
    Bytes,
    Str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    ReadOnly,
    Writable,
    /// Writable and accepts attached ICX.
    Payable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSchema {
    pub name: &'static str,
    pub mutability: Mutability,
    pub params: &'static [ParamSpec],
}

impl MethodSchema {
    pub fn is_read_only(&self) -> bool {
        self.mutability == Mutability::ReadOnly
    }

    pub fn is_payable(&self) -> bool {
        self.mutability == Mutability::Payable
    }

    /// Checks names and kinds of `params` against this method's signature.
    pub fn check(&self, params: &Params) -> Result<(), PayloadError> {
        for (name, _) in params.iter() {
            if !self.params.iter().any(|param| param.name == name) {
                return Err(PayloadError::UnexpectedParam(name.to_string()));
            }
        }

        for param in self.params {
            match params.get(param.name) {
                Some(value) if !value.fits(param.kind) => {
                    return Err(PayloadError::ParamKind {
                        name: param.name.to_string(),
                        expected: param.kind,
                    });
                }
                None if !param.optional => {
                    return Err(PayloadError::MissingParam(param.name.to_string()));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

const fn req(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        optional: false,
    }
}

const fn opt(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        optional: true,
    }
}

const fn read(name: &'static str, params: &'static [ParamSpec]) -> MethodSchema {
    MethodSchema {
        name,
        mutability: Mutability::ReadOnly,
        params,
    }
}

const fn write(name: &'static str, params: &'static [ParamSpec]) -> MethodSchema {
    MethodSchema {
        name,
        mutability: Mutability::Writable,
        params,
    }
}

const fn payable(name: &'static str, params: &'static [ParamSpec]) -> MethodSchema {
    MethodSchema {
        name,
        mutability: Mutability::Payable,
        params,
    }
}

use ParamKind::{Address, Bool, Bytes, Int, Str};

static DEX_METHODS: &[MethodSchema] = &[
    read("getPrice", &[req("_id", Int)]),
    read("getQuotePriceInBase", &[req("_id", Int)]),
    write(
        "add",
        &[
            req("_baseToken", Address),
            req("_quoteToken", Address),
            req("_baseValue", Int),
            req("_quoteValue", Int),
        ],
    ),
    read("balanceOf", &[req("_owner", Address), req("_id", Int)]),
    read("totalSupply", &[req("_id", Int)]),
    read("getPoolTotal", &[req("_id", Int), req("_token", Address)]),
    read(
        "getDeposit",
        &[req("_tokenAddress", Address), req("_user", Address)],
    ),
    read("getICXWithdrawLock", &[]),
    write("cancelSicxicxOrder", &[]),
    // Withdraws up to the user's holdings in a pool once the withdrawal lock has passed.
    write(
        "remove",
        &[req("_id", Int), req("_value", Int), req("_withdraw", Int)],
    ),
    read("getFees", &[]),
    read(
        "isEarningRewards",
        &[req("_address", Address), req("_id", Int)],
    ),
    write("withdraw", &[req("_token", Address), req("_value", Int)]),
    read("getICXBalance", &[req("_address", Address)]),
    read("getSicxEarnings", &[req("_user", Address)]),
    write("withdrawSicxEarnings", &[]),
];

static IRC2_METHODS: &[MethodSchema] = &[
    read("balanceOf", &[req("_owner", Address)]),
    read("totalSupply", &[]),
    read("decimals", &[]),
    write(
        "transfer",
        &[req("_to", Address), req("_value", Int), opt("_data", Bytes)],
    ),
];

static STAKING_METHODS: &[MethodSchema] = &[
    payable("stakeICX", &[opt("_to", Address)]),
    read("getTodayRate", &[]),
];

static LOANS_METHODS: &[MethodSchema] = &[
    payable("depositAndBorrow", &[opt("_asset", Str), opt("_amount", Int)]),
    write("returnAsset", &[req("_symbol", Str), req("_value", Int)]),
    write("withdrawCollateral", &[req("_value", Int)]),
    read("getAccountPositions", &[req("_owner", Address)]),
];

static REWARDS_METHODS: &[MethodSchema] = &[
    write("claimRewards", &[]),
    read("getBalnHolding", &[req("_holder", Address)]),
];

static GOVERNANCE_METHODS: &[MethodSchema] = &[
    write("castVote", &[req("vote_index", Int), req("vote", Bool)]),
    read("checkVote", &[req("_vote_index", Int)]),
    read("getProposalCount", &[]),
    read("getProposals", &[opt("batch_size", Int), opt("offset", Int)]),
    read(
        "getVotesFromAddress",
        &[req("vote_index", Int), req("_address", Address)],
    ),
];

/// Liquidity pool id on the Dex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub u32);

impl PoolId {
    pub const SICX_ICX: PoolId = PoolId(1);
    pub const SICX_BNUSD: PoolId = PoolId(2);
    pub const BALN_BNUSD: PoolId = PoolId(3);
    pub const BALN_SICX: PoolId = PoolId(4);
}
