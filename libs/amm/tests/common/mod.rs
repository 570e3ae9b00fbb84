//! Shared fixtures for pool engine integration tests

#![allow(dead_code)]

use std::sync::Arc;
use torq_amm::{
    AddLiquidity, InMemoryLedger, ManualClock, PoolEngine, RemoveLiquidity, Swap,
};
use torq_types::{AssetId, HolderId};

pub const VAULT: HolderId = HolderId::from_low_u64(0xfee);
pub const ALICE: HolderId = HolderId::from_low_u64(0xa11ce);
pub const BOB: HolderId = HolderId::from_low_u64(0xb0b);

pub const TOKEN_X: AssetId = AssetId::from_low_u64(0x1000);
pub const TOKEN_Y: AssetId = AssetId::from_low_u64(0x2000);

pub const START: u64 = 1_700_000_000;
pub const FUNDING: u128 = 1_000_000_000;

/// One whole unit of an 18-decimal asset
pub const E18: u128 = 1_000_000_000_000_000_000;

pub type TestEngine = PoolEngine<Arc<InMemoryLedger>, Arc<ManualClock>>;

/// Engine over a funded in-memory ledger and a manual clock at [`START`]
pub fn funded_engine() -> TestEngine {
    funded_engine_with(FUNDING)
}

/// [`funded_engine`] with `funding` of each asset for each holder
pub fn funded_engine_with(funding: u128) -> TestEngine {
    let ledger = Arc::new(InMemoryLedger::new(VAULT));
    for holder in [ALICE, BOB] {
        for asset in [TOKEN_X, TOKEN_Y] {
            ledger.mint(asset, holder, funding).unwrap();
        }
    }
    PoolEngine::new(ledger, Arc::new(ManualClock::new(START)), VAULT)
}

pub fn deposit(
    asset_a: AssetId,
    asset_b: AssetId,
    desired_a: u128,
    desired_b: u128,
) -> AddLiquidity {
    AddLiquidity {
        asset_a,
        asset_b,
        desired_a,
        desired_b,
        min_a: 0,
        min_b: 0,
        recipient: ALICE,
        deadline: START,
    }
}

pub fn withdrawal(asset_a: AssetId, asset_b: AssetId, shares: u128) -> RemoveLiquidity {
    RemoveLiquidity {
        asset_a,
        asset_b,
        shares,
        min_a: 0,
        min_b: 0,
        recipient: ALICE,
        deadline: START,
    }
}

pub fn swap(asset_in: AssetId, asset_out: AssetId, amount_in: u128) -> Swap {
    Swap {
        amount_in,
        min_out: 0,
        path: vec![asset_in, asset_out],
        recipient: BOB,
        deadline: START,
    }
}

/// Every balance the engine can touch, for before/after comparisons
pub fn balances(engine: &TestEngine) -> Vec<u128> {
    use torq_amm::AssetLedger;
    let mut out = Vec::new();
    for holder in [ALICE, BOB, VAULT] {
        for asset in [TOKEN_X, TOKEN_Y] {
            out.push(engine.ledger().balance_of(asset, holder));
        }
    }
    out
}
