//! Pool notifications
//!
//! Emitted after an operation commits. Consumers observe them; nothing in
//! the engine reads them back.

use crate::pair_key::PairKey;
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use torq_types::{AssetId, HolderId};

/// Subscriber end of the engine's event channel
pub type EventReceiver = Receiver<PoolEvent>;

/// Events that describe committed pool changes
///
/// Assets and amounts are in the caller's order, not canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolEvent {
    LiquidityAdded {
        pair: PairKey,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a: u128,
        amount_b: u128,
        shares: u128,
        recipient: HolderId,
    },
    LiquidityRemoved {
        pair: PairKey,
        asset_a: AssetId,
        asset_b: AssetId,
        amount_a: u128,
        amount_b: u128,
        shares: u128,
        recipient: HolderId,
    },
    SwapExecuted {
        pair: PairKey,
        asset_in: AssetId,
        asset_out: AssetId,
        amount_in: u128,
        amount_out: u128,
        recipient: HolderId,
    },
}

impl PoolEvent {
    pub fn pair(&self) -> PairKey {
        match self {
            PoolEvent::LiquidityAdded { pair, .. }
            | PoolEvent::LiquidityRemoved { pair, .. }
            | PoolEvent::SwapExecuted { pair, .. } => *pair,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PoolEvent::LiquidityAdded { .. } => "liquidity_added",
            PoolEvent::LiquidityRemoved { .. } => "liquidity_removed",
            PoolEvent::SwapExecuted { .. } => "swap_executed",
        }
    }
}
