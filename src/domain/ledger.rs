//! Value ledger that hosts the lottery contracts.
//!
//! The contract never owns money directly: stakes are moved into the pool's
//! custody account and payouts are moved out of it through the [`Ledger`]
//! trait. [`InMemoryLedger`] is the in-process implementation used by the
//! gateway. It behaves like an automining development node: every committed
//! call seals exactly one block, and a flat fee is charged to the account
//! that submitted the call.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::AccountId;

/// Failures surfaced by the ledger. Every failing operation leaves all
/// balances exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No account with this identity has been opened.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    /// The source account cannot cover the requested amount.
    #[error("account {account} holds {balance} wei, {required} wei required")]
    InsufficientFunds {
        /// Account that was debited.
        account: AccountId,
        /// Balance at the time of the attempt.
        balance: u128,
        /// Amount the operation needed.
        required: u128,
    },

    /// The destination account refuses inbound transfers.
    #[error("account {0} rejected the payment")]
    PaymentRejected(AccountId),

    /// Crediting the account would overflow its balance.
    #[error("balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    /// Contract custody accounts hold escrow and cannot submit calls.
    #[error("account {0} is a contract account and cannot submit calls")]
    ContractSubmitter(AccountId),
}

/// Metadata of the most recently sealed block.
///
/// The hash chains every block to its predecessor and mixes in the commit
/// timestamp, so its value is not known to anyone before the block is sealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Block height, `0` for genesis.
    pub height: u64,
    /// Time the block was sealed.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 block hash.
    pub hash: [u8; 32],
}

impl BlockInfo {
    fn genesis(now: DateTime<Utc>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"lottery-gateway/genesis");
        hasher.update(now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        Self {
            height: 0,
            timestamp: now,
            hash: hasher.finalize().into(),
        }
    }

    /// Lowercase hex rendering of the block hash.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Chain-level counters reported by [`InMemoryLedger::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStatus {
    /// Most recently sealed block.
    pub latest_block: BlockInfo,
    /// Opened accounts, custody accounts included.
    pub accounts: usize,
    /// Contract custody accounts among them.
    pub contract_accounts: usize,
    /// Flat fee per committed call (wei).
    pub tx_fee: u128,
    /// Fees burned so far (wei).
    pub total_fees_burned: u128,
}

/// Host-side operations the contract relies on.
///
/// Implementations must make [`Ledger::transfer`] all-or-nothing.
pub trait Ledger {
    /// Returns the balance of `account` in wei.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownAccount`] if the account does not exist.
    fn balance_of(&self, account: AccountId) -> Result<u128, LedgerError>;

    /// Moves `amount` wei from `from` to `to` atomically.
    ///
    /// # Errors
    ///
    /// Any [`LedgerError`]; on error no balance has changed.
    fn transfer(&mut self, from: AccountId, to: AccountId, amount: u128)
    -> Result<(), LedgerError>;

    /// Returns metadata of the most recently sealed block.
    fn latest_block(&self) -> BlockInfo;
}

#[derive(Debug, Clone, Default)]
struct AccountState {
    balance: u128,
    rejects_payments: bool,
    contract: bool,
}

/// In-process ledger with accounts, balances, blocks and flat fees.
#[derive(Debug)]
pub struct InMemoryLedger {
    accounts: HashMap<AccountId, AccountState>,
    latest: BlockInfo,
    tx_fee: u128,
    fees_burned: u128,
}

impl InMemoryLedger {
    /// Creates an empty ledger charging `tx_fee` wei per committed call.
    #[must_use]
    pub fn new(tx_fee: u128) -> Self {
        Self {
            accounts: HashMap::new(),
            latest: BlockInfo::genesis(Utc::now()),
            tx_fee,
            fees_burned: 0,
        }
    }

    /// Opens a new account holding `initial_balance` wei.
    pub fn open_account(&mut self, initial_balance: u128) -> AccountId {
        self.insert_account(AccountState {
            balance: initial_balance,
            ..AccountState::default()
        })
    }

    /// Opens an empty custody account for a contract. It can receive and
    /// pay out through [`Ledger::transfer`] but never submits calls.
    pub fn open_contract_account(&mut self) -> AccountId {
        self.insert_account(AccountState {
            contract: true,
            ..AccountState::default()
        })
    }

    fn insert_account(&mut self, state: AccountState) -> AccountId {
        let id = AccountId::new();
        self.accounts.insert(id, state);
        id
    }

    /// Returns `true` if the account is a contract custody account.
    #[must_use]
    pub fn is_contract_account(&self, account: AccountId) -> bool {
        self.accounts.get(&account).is_some_and(|s| s.contract)
    }

    /// Mints `amount` wei into an existing account. Returns the new balance.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownAccount`] or [`LedgerError::BalanceOverflow`].
    pub fn fund(&mut self, account: AccountId, amount: u128) -> Result<u128, LedgerError> {
        let state = self
            .accounts
            .get_mut(&account)
            .ok_or(LedgerError::UnknownAccount(account))?;
        state.balance = state
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(account))?;
        Ok(state.balance)
    }

    /// Makes an account refuse (or accept again) inbound transfers.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownAccount`] if the account does not exist.
    pub fn set_rejects_payments(
        &mut self,
        account: AccountId,
        rejects: bool,
    ) -> Result<(), LedgerError> {
        let state = self
            .accounts
            .get_mut(&account)
            .ok_or(LedgerError::UnknownAccount(account))?;
        state.rejects_payments = rejects;
        Ok(())
    }

    /// Flat fee in wei charged per committed call.
    #[must_use]
    pub const fn tx_fee(&self) -> u128 {
        self.tx_fee
    }

    /// Total fees charged and removed from circulation so far.
    #[must_use]
    pub const fn total_fees_burned(&self) -> u128 {
        self.fees_burned
    }

    /// Number of opened accounts, contract custody accounts included.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Snapshot of chain-level counters.
    #[must_use]
    pub fn status(&self) -> LedgerStatus {
        LedgerStatus {
            latest_block: self.latest,
            accounts: self.account_count(),
            contract_accounts: self.accounts.values().filter(|s| s.contract).count(),
            tx_fee: self.tx_fee,
            total_fees_burned: self.fees_burned,
        }
    }

    /// Checks that `account` may submit a call and could pay `value` plus
    /// the call fee.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownAccount`], [`LedgerError::ContractSubmitter`]
    /// or [`LedgerError::InsufficientFunds`].
    pub fn ensure_can_pay(&self, account: AccountId, value: u128) -> Result<(), LedgerError> {
        let balance = self.balance_of(account)?;
        if self.is_contract_account(account) {
            return Err(LedgerError::ContractSubmitter(account));
        }
        let required = value
            .checked_add(self.tx_fee)
            .ok_or(LedgerError::BalanceOverflow(account))?;
        if balance < required {
            return Err(LedgerError::InsufficientFunds {
                account,
                balance,
                required,
            });
        }
        Ok(())
    }

    /// Charges the call fee to `payer` and burns it. Returns the fee.
    ///
    /// # Errors
    ///
    /// [`LedgerError::UnknownAccount`] or [`LedgerError::InsufficientFunds`].
    pub fn charge_fee(&mut self, payer: AccountId) -> Result<u128, LedgerError> {
        let fee = self.tx_fee;
        let state = self
            .accounts
            .get_mut(&payer)
            .ok_or(LedgerError::UnknownAccount(payer))?;
        state.balance = state
            .balance
            .checked_sub(fee)
            .ok_or(LedgerError::InsufficientFunds {
                account: payer,
                balance: state.balance,
                required: fee,
            })?;
        self.fees_burned = self.fees_burned.saturating_add(fee);
        Ok(fee)
    }

    /// Seals a new block for a call submitted by `submitter`.
    pub fn seal_block(&mut self, submitter: AccountId) -> BlockInfo {
        let prev = self.latest;
        let timestamp = Utc::now().max(prev.timestamp);
        let height = prev.height.saturating_add(1);

        let mut hasher = Sha256::new();
        hasher.update(prev.hash);
        hasher.update(height.to_le_bytes());
        hasher.update(timestamp.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        hasher.update(submitter.as_bytes());

        self.latest = BlockInfo {
            height,
            timestamp,
            hash: hasher.finalize().into(),
        };
        self.latest
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Ledger for InMemoryLedger {
    fn balance_of(&self, account: AccountId) -> Result<u128, LedgerError> {
        self.accounts
            .get(&account)
            .map(|s| s.balance)
            .ok_or(LedgerError::UnknownAccount(account))
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        // Validate everything up front; mutate only once nothing can fail.
        let from_balance = self.balance_of(from)?;
        let to_state = self
            .accounts
            .get(&to)
            .ok_or(LedgerError::UnknownAccount(to))?;
        if to_state.rejects_payments {
            return Err(LedgerError::PaymentRejected(to));
        }
        if from_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                account: from,
                balance: from_balance,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let new_to = to_state
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;

        if let Some(state) = self.accounts.get_mut(&from) {
            state.balance = from_balance - amount;
        }
        if let Some(state) = self.accounts.get_mut(&to) {
            state.balance = new_to;
        }
        Ok(())
    }

    fn latest_block(&self) -> BlockInfo {
        self.latest
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn open_account_starts_with_initial_balance() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(500);
        assert_eq!(ledger.balance_of(a), Ok(500));
        assert_eq!(ledger.account_count(), 1);
    }

    #[test]
    fn unknown_account_is_reported() {
        let ledger = InMemoryLedger::default();
        let ghost = AccountId::new();
        assert_eq!(
            ledger.balance_of(ghost),
            Err(LedgerError::UnknownAccount(ghost))
        );
    }

    #[test]
    fn transfer_moves_exact_amount() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(1_000);
        let b = ledger.open_account(0);

        assert!(ledger.transfer(a, b, 300).is_ok());
        assert_eq!(ledger.balance_of(a), Ok(700));
        assert_eq!(ledger.balance_of(b), Ok(300));
    }

    #[test]
    fn failed_transfer_changes_nothing() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(100);
        let b = ledger.open_account(5);

        let result = ledger.transfer(a, b, 101);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { required: 101, balance: 100, .. })
        ));
        assert_eq!(ledger.balance_of(a), Ok(100));
        assert_eq!(ledger.balance_of(b), Ok(5));

        let ghost = AccountId::new();
        assert_eq!(
            ledger.transfer(a, ghost, 1),
            Err(LedgerError::UnknownAccount(ghost))
        );
        assert_eq!(ledger.balance_of(a), Ok(100));
    }

    #[test]
    fn rejecting_account_blocks_inbound_transfers() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(100);
        let b = ledger.open_account(0);
        assert!(ledger.set_rejects_payments(b, true).is_ok());

        assert_eq!(ledger.transfer(a, b, 10), Err(LedgerError::PaymentRejected(b)));
        assert_eq!(ledger.balance_of(a), Ok(100));

        assert!(ledger.set_rejects_payments(b, false).is_ok());
        assert!(ledger.transfer(a, b, 10).is_ok());
        assert_eq!(ledger.balance_of(b), Ok(10));
    }

    #[test]
    fn credit_overflow_is_rejected() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(10);
        let b = ledger.open_account(u128::MAX);
        assert_eq!(ledger.transfer(a, b, 1), Err(LedgerError::BalanceOverflow(b)));
        assert_eq!(ledger.fund(b, 1), Err(LedgerError::BalanceOverflow(b)));
        assert_eq!(ledger.balance_of(a), Ok(10));
    }

    #[test]
    fn self_transfer_is_a_no_op() {
        let mut ledger = InMemoryLedger::default();
        let a = ledger.open_account(50);
        assert!(ledger.transfer(a, a, 50).is_ok());
        assert_eq!(ledger.balance_of(a), Ok(50));
    }

    #[test]
    fn fees_are_charged_and_burned() {
        let mut ledger = InMemoryLedger::new(7);
        let a = ledger.open_account(20);

        assert!(ledger.ensure_can_pay(a, 13).is_ok());
        assert!(ledger.ensure_can_pay(a, 14).is_err());

        assert_eq!(ledger.charge_fee(a), Ok(7));
        assert_eq!(ledger.balance_of(a), Ok(13));
        assert_eq!(ledger.total_fees_burned(), 7);

        let custody = ledger.open_contract_account();
        assert!(ledger.transfer(a, custody, 3).is_ok());
        let status = ledger.status();
        assert_eq!(status.accounts, 2);
        assert_eq!(status.contract_accounts, 1);
        assert_eq!(status.tx_fee, 7);
        assert_eq!(status.total_fees_burned, 7);
    }

    #[test]
    fn contract_accounts_cannot_submit_calls() {
        let mut ledger = InMemoryLedger::default();
        let player = ledger.open_account(100);
        let custody = ledger.open_contract_account();
        assert!(ledger.is_contract_account(custody));
        assert!(!ledger.is_contract_account(player));
        assert_eq!(ledger.balance_of(custody), Ok(0));

        assert!(ledger.transfer(player, custody, 60).is_ok());
        assert_eq!(
            ledger.ensure_can_pay(custody, 0),
            Err(LedgerError::ContractSubmitter(custody))
        );
        assert!(ledger.transfer(custody, player, 60).is_ok());
        assert_eq!(ledger.balance_of(player), Ok(100));
    }

    #[test]
    fn fee_larger_than_balance_fails_without_effect() {
        let mut ledger = InMemoryLedger::new(50);
        let a = ledger.open_account(10);
        assert!(ledger.charge_fee(a).is_err());
        assert_eq!(ledger.balance_of(a), Ok(10));
        assert_eq!(ledger.total_fees_burned(), 0);
    }

    #[test]
    fn sealing_advances_height_and_changes_hash() {
        let mut ledger = InMemoryLedger::default();
        let genesis = ledger.latest_block();
        assert_eq!(genesis.height, 0);

        let who = ledger.open_account(0);
        let b1 = ledger.seal_block(who);
        let b2 = ledger.seal_block(who);

        assert_eq!(b1.height, 1);
        assert_eq!(b2.height, 2);
        assert_ne!(b1.hash, genesis.hash);
        assert_ne!(b2.hash, b1.hash);
        assert!(b2.timestamp >= b1.timestamp);
        assert_eq!(ledger.latest_block(), b2);
        assert_eq!(b2.hash_hex().len(), 64);
    }
}
