//! Asset custody capability
//!
//! The engine never moves balances itself. It asks an [`AssetLedger`] to pull
//! deposits into the vault and to push withdrawals and swap proceeds out of
//! it. Any asset implementation can back a pool as long as it satisfies the
//! trait.

use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;
use torq_types::{AssetId, HolderId};

/// Ledger transfer failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance of {asset} for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: AssetId,
        holder: HolderId,
        needed: u128,
        available: u128,
    },

    #[error("Transfer of {asset} rejected: {reason}")]
    Rejected { asset: AssetId, reason: String },

    #[error("Balance overflow crediting {asset} to {holder}")]
    Overflow { asset: AssetId, holder: HolderId },
}

/// Transfer capability over fungible assets
///
/// `transfer_from` moves an owner's balance (the engine is the approved
/// spender). `transfer` pays out of the engine's own vault.
pub trait AssetLedger: Send + Sync {
    fn transfer_from(
        &self,
        asset: AssetId,
        owner: HolderId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn transfer(
        &self,
        asset: AssetId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn balance_of(&self, asset: AssetId, holder: HolderId) -> u128;
}

impl<L: AssetLedger + ?Sized> AssetLedger for std::sync::Arc<L> {
    fn transfer_from(
        &self,
        asset: AssetId,
        owner: HolderId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        (**self).transfer_from(asset, owner, recipient, amount)
    }

    fn transfer(
        &self,
        asset: AssetId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        (**self).transfer(asset, recipient, amount)
    }

    fn balance_of(&self, asset: AssetId, holder: HolderId) -> u128 {
        (**self).balance_of(asset, holder)
    }
}

/// In-process ledger keyed by `(asset, holder)`
///
/// Used by tests and the replay service. The vault is the account `transfer`
/// pays from.
#[derive(Debug)]
pub struct InMemoryLedger {
    vault: HolderId,
    balances: Mutex<HashMap<(AssetId, HolderId), u128>>,
}

impl InMemoryLedger {
    pub fn new(vault: HolderId) -> Self {
        Self {
            vault,
            balances: Mutex::new(HashMap::new()),
        }
    }

    pub fn vault(&self) -> HolderId {
        self.vault
    }

    /// Credit `amount` of `asset` to `holder` out of thin air
    pub fn mint(
        &self,
        asset: AssetId,
        holder: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock();
        let balance = balances.entry((asset, holder)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { asset, holder })?;
        Ok(())
    }

    fn move_balance(
        &self,
        asset: AssetId,
        from: HolderId,
        to: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.lock();
        let available = balances.get(&(asset, from)).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                holder: from,
                needed: amount,
                available,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }
        let credited = balances
            .get(&(asset, to))
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { asset, holder: to })?;

        balances.insert((asset, from), available - amount);
        balances.insert((asset, to), credited);
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn transfer_from(
        &self,
        asset: AssetId,
        owner: HolderId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.move_balance(asset, owner, recipient, amount)
    }

    fn transfer(
        &self,
        asset: AssetId,
        recipient: HolderId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.move_balance(asset, self.vault, recipient, amount)
    }

    fn balance_of(&self, asset: AssetId, holder: HolderId) -> u128 {
        self.balances
            .lock()
            .get(&(asset, holder))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: HolderId = HolderId::from_low_u64(0xfee);
    const ALICE: HolderId = HolderId::from_low_u64(0xa);
    const TOKEN: AssetId = AssetId::from_low_u64(0x70);

    #[test]
    fn test_transfer_from_moves_balance() {
        let ledger = InMemoryLedger::new(VAULT);
        ledger.mint(TOKEN, ALICE, 100).unwrap();

        ledger.transfer_from(TOKEN, ALICE, VAULT, 40).unwrap();

        assert_eq!(ledger.balance_of(TOKEN, ALICE), 60);
        assert_eq!(ledger.balance_of(TOKEN, VAULT), 40);
    }

    #[test]
    fn test_transfer_pays_from_vault() {
        let ledger = InMemoryLedger::new(VAULT);
        ledger.mint(TOKEN, VAULT, 10).unwrap();

        ledger.transfer(TOKEN, ALICE, 10).unwrap();

        assert_eq!(ledger.balance_of(TOKEN, VAULT), 0);
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 10);
    }

    #[test]
    fn test_overdraft_rejected_without_change() {
        let ledger = InMemoryLedger::new(VAULT);
        ledger.mint(TOKEN, ALICE, 5).unwrap();

        let err = ledger.transfer_from(TOKEN, ALICE, VAULT, 6).unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                asset: TOKEN,
                holder: ALICE,
                needed: 6,
                available: 5
            }
        );
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 5);
        assert_eq!(ledger.balance_of(TOKEN, VAULT), 0);
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let ledger = InMemoryLedger::new(VAULT);
        ledger.mint(TOKEN, ALICE, 5).unwrap();
        ledger.transfer_from(TOKEN, ALICE, ALICE, 5).unwrap();
        assert_eq!(ledger.balance_of(TOKEN, ALICE), 5);
    }

    #[test]
    fn test_mint_overflow() {
        let ledger = InMemoryLedger::new(VAULT);
        ledger.mint(TOKEN, ALICE, u128::MAX).unwrap();
        assert!(matches!(
            ledger.mint(TOKEN, ALICE, 1),
            Err(LedgerError::Overflow { .. })
        ));
    }
}
