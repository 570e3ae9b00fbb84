//! # Torq Types - Shared Identifiers for the AMM Engine
//!
//! Address-typed identifiers used across the pool engine, its configuration
//! and the replay service:
//!
//! - [`AssetId`]: fungible asset identifier with a null sentinel ([`AssetId::ZERO`])
//! - [`HolderId`]: account identifier for balances and liquidity shares
//!
//! Both are 20-byte addresses ordered as big-endian integers and encoded as
//! `0x`-prefixed hex everywhere they leave the process.

pub mod common;

pub use common::errors::ValidationError;
pub use common::identifiers::{AssetId, HolderId, ADDRESS_LEN};
