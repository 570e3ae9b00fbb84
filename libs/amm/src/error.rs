//! Pool engine error taxonomy
//!
//! Every variant is a well-defined rejection of caller-supplied input or
//! state. None of them indicate an internal fault, and an operation that
//! returns one has left all pool state and ledger balances untouched.

use crate::ledger::LedgerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a caller-ordered pair a bound refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("Expired: deadline {deadline} is before current time {now}")]
    Expired { deadline: u64, now: u64 },

    #[error("Identical assets: a pool needs two distinct assets")]
    IdenticalAssets,

    #[error("Zero asset: the null address cannot be pooled")]
    ZeroAsset,

    #[error("Insufficient {0} amount")]
    InsufficientAmount(Side),

    #[error("Insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    #[error("Insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    #[error("Pool not found")]
    PoolNotFound,

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: u128, available: u128 },

    #[error("Invalid path: expected 2 assets, got {len}")]
    InvalidPath { len: usize },

    #[error("Insufficient output: {amount_out} below minimum {min_out}")]
    InsufficientOutput { amount_out: u128, min_out: u128 },

    #[error("Insufficient input amount")]
    InsufficientInput,

    #[error("Insufficient liquidity")]
    InsufficientLiquidity,

    #[error("Pool is locked by an operation in flight")]
    Locked,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type AmmResult<T> = std::result::Result<T, AmmError>;
