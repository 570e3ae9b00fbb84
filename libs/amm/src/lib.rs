//! # Torq AMM Library - Constant-Product Pool Engine
//!
//! ## Purpose
//!
//! Pooled-liquidity exchange engine for any two fungible assets. Liquidity
//! providers deposit both sides of a pair and receive proportional shares;
//! traders swap one side for the other along the `x * y = k` curve with a
//! 0.3% fee retained by the pool.
//!
//! ## Integration Points
//!
//! - **Custody**: [`AssetLedger`] moves balances in and out of the engine vault
//! - **Time**: [`Clock`] drives deadline admission
//! - **Notifications**: [`PoolEvent`] on a bounded crossbeam channel
//! - **Configuration**: vault and channel capacity from `torq_config::EngineConfig`
//!
//! ## Architecture Role
//!
//! ```text
//! PoolEngine ──► pair_key (canonical key)
//!     ├──► registry (PoolSlot: RwLock<Pool> + execution lock)
//!     ├──► liquidity_math (mint / burn plans, isqrt)
//!     ├──► swap_math (amount out / in, quote, spot price)
//!     │        └──► wide (U256 / U512 intermediates)
//!     └──► AssetLedger transfers, then commit and PoolEvent
//! ```
//!
//! ## Numeric Guarantees
//!
//! - **Integers only**: every amount is a `u128`, products are widened to 256/512 bits
//!   and narrowed with a checked conversion
//! - **Rounding favors the pool**: outputs floor, required inputs round up
//! - **First-deposit lock**: `MINIMUM_LIQUIDITY` shares are owned by nobody
//! - **Order independence**: `(A, B)` and `(B, A)` address the same pool

pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod isqrt;
pub mod ledger;
pub mod liquidity_math;
pub mod pair_key;
pub mod pool;
pub mod registry;
pub mod swap_math;
pub mod wide;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{
    AddLiquidity, EngineStats, LiquidityAdded, LiquidityRemoved, PoolEngine, RemoveLiquidity,
    Swap, SwapExecuted,
};
pub use error::{AmmError, AmmResult, Side};
pub use events::{EventReceiver, PoolEvent};
pub use isqrt::{isqrt, isqrt_wide};
pub use ledger::{AssetLedger, InMemoryLedger, LedgerError};
pub use liquidity_math::{plan_deposit, plan_withdrawal, DepositPlan, WithdrawalPlan};
pub use pair_key::{pair_key, sort_assets, PairKey, ResolvedPair};
pub use pool::{Pool, PoolSnapshot, PoolStatus};
pub use registry::{PoolHandle, PoolLock, PoolRegistry, PoolSlot};
pub use swap_math::{get_amount_in, get_amount_out, plan_swap, quote, spot_price, SwapPlan};

pub use torq_types::{AssetId, HolderId};
