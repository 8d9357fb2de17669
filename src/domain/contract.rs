//! The pooled-wager lottery contract.
//!
//! [`PoolContract`] owns one round of state: the operator who deployed it,
//! the ordered entrant list, and the pooled balance held in its custody
//! account on the [`Ledger`]. Every operation is a single state transition:
//! it either returns `Ok` with all of its effects applied, or returns an
//! error having changed nothing, on the contract or on the ledger.
//!
//! ```text
//!            enter (stake >= min)
//!          ┌───────────────┐
//!          ▼               │
//!       ┌──────┐  pick_winner (operator, ≥1 entrant)  ┌─────────┐
//!       │ Open │ ───────────────────────────────────▶ │ Drawing │
//!       └──────┘ ◀─────────────────────────────────── └─────────┘
//!                   payout + reset, round += 1
//! ```

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::AccountId;
use super::ledger::{Ledger, LedgerError};
use super::randomness::RandomnessProvider;

/// Reasons a contract call is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// The attached stake is below the pool minimum.
    #[error("stake of {stake} wei is below the minimum of {minimum} wei")]
    InsufficientStake {
        /// Stake attached to the call.
        stake: u128,
        /// Minimum accepted by this pool.
        minimum: u128,
    },

    /// Only the operator may draw.
    #[error("account {caller} is not the pool operator")]
    Unauthorized {
        /// Identity that attempted the call.
        caller: AccountId,
    },

    /// The pool's own custody account tried to enter.
    #[error("custody account {0} cannot enter its own pool")]
    CustodyEntry(AccountId),

    /// A draw was requested with nobody entered.
    #[error("no entrants in the current round")]
    NoEntrants,

    /// The host could not move the stake into pool custody.
    #[error("stake transfer failed: {0}")]
    StakeTransfer(#[source] LedgerError),

    /// The host could not pay the winner; the round is left untouched.
    #[error("payout transfer failed: {0}")]
    PayoutTransfer(#[source] LedgerError),
}

/// Result of a successful entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryReceipt {
    /// Account that entered.
    pub player: AccountId,
    /// Stake received.
    pub stake: u128,
    /// Entrant count after this entry.
    pub entrant_count: usize,
    /// Pool balance after this entry.
    pub pool_balance: u128,
}

/// Result of a successful draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DrawOutcome {
    /// Round number that was closed, starting at 1.
    pub round: u64,
    /// Account that received the pool.
    pub winner: AccountId,
    /// Position of the winning entry in the entrant list.
    pub winner_index: usize,
    /// Amount paid out in wei.
    #[serde(with = "wei_string")]
    #[schema(value_type = String)]
    pub prize: u128,
    /// Number of entries the winner was drawn from.
    pub entrant_count: usize,
}

mod wei_string {
    use serde::Serializer;

    pub(super) fn serialize<S: Serializer>(value: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(value)
    }
}

/// One lottery pool.
#[derive(Debug, Clone)]
pub struct PoolContract {
    operator: AccountId,
    custody: AccountId,
    min_stake: u128,
    entrants: Vec<AccountId>,
    balance: u128,
    round: u64,
    last_draw: Option<DrawOutcome>,
}

impl PoolContract {
    /// Deploys a pool. `operator` is the deploying caller and is fixed for
    /// the lifetime of the pool; `custody` is the ledger account that will
    /// hold the pooled stakes.
    #[must_use]
    pub const fn new(operator: AccountId, custody: AccountId, min_stake: u128) -> Self {
        Self {
            operator,
            custody,
            min_stake,
            entrants: Vec::new(),
            balance: 0,
            round: 0,
            last_draw: None,
        }
    }

    /// Enters `caller` into the current round with `stake` wei.
    ///
    /// The same account may enter any number of times; each entry occupies
    /// its own slot.
    ///
    /// # Errors
    ///
    /// - [`ContractError::CustodyEntry`] if `caller` is this pool's custody account.
    /// - [`ContractError::InsufficientStake`] if `stake` is below the minimum.
    /// - [`ContractError::StakeTransfer`] if the ledger cannot debit `caller`.
    pub fn enter<L>(
        &mut self,
        caller: AccountId,
        stake: u128,
        ledger: &mut L,
    ) -> Result<EntryReceipt, ContractError>
    where
        L: Ledger + ?Sized,
    {
        if caller == self.custody {
            return Err(ContractError::CustodyEntry(caller));
        }
        if stake < self.min_stake {
            return Err(ContractError::InsufficientStake {
                stake,
                minimum: self.min_stake,
            });
        }
        let new_balance = self
            .balance
            .checked_add(stake)
            .ok_or(ContractError::StakeTransfer(LedgerError::BalanceOverflow(
                self.custody,
            )))?;

        ledger
            .transfer(caller, self.custody, stake)
            .map_err(ContractError::StakeTransfer)?;

        self.entrants.push(caller);
        self.balance = new_balance;

        Ok(EntryReceipt {
            player: caller,
            stake,
            entrant_count: self.entrants.len(),
            pool_balance: self.balance,
        })
    }

    /// Entrants of the current round, in entry order.
    #[must_use]
    pub fn get_all_players(&self) -> &[AccountId] {
        &self.entrants
    }

    /// Draws a winner, pays out the whole pool and opens the next round.
    ///
    /// # Errors
    ///
    /// - [`ContractError::Unauthorized`] if `caller` is not the operator.
    /// - [`ContractError::NoEntrants`] if nobody has entered this round.
    /// - [`ContractError::PayoutTransfer`] if the ledger refuses the payout.
    pub fn pick_winner<L>(
        &mut self,
        caller: AccountId,
        ledger: &mut L,
        randomness: &dyn RandomnessProvider,
    ) -> Result<DrawOutcome, ContractError>
    where
        L: Ledger + ?Sized,
    {
        if caller != self.operator {
            return Err(ContractError::Unauthorized { caller });
        }
        let entrant_count = self.entrants.len();
        if entrant_count == 0 {
            return Err(ContractError::NoEntrants);
        }

        let block = ledger.latest_block();
        let winner_index = randomness.next_index(entrant_count, &block) % entrant_count;
        let winner = *self
            .entrants
            .get(winner_index)
            .ok_or(ContractError::NoEntrants)?;
        let prize = self.balance;

        ledger
            .transfer(self.custody, winner, prize)
            .map_err(ContractError::PayoutTransfer)?;

        let outcome = DrawOutcome {
            round: self.round.saturating_add(1),
            winner,
            winner_index,
            prize,
            entrant_count,
        };
        self.entrants.clear();
        self.balance = 0;
        self.round = outcome.round;
        self.last_draw = Some(outcome);

        Ok(outcome)
    }

    /// Identity allowed to draw.
    #[must_use]
    pub const fn operator(&self) -> AccountId {
        self.operator
    }

    /// Ledger account holding the pooled stakes.
    #[must_use]
    pub const fn custody_account(&self) -> AccountId {
        self.custody
    }

    /// Minimum stake per entry in wei.
    #[must_use]
    pub const fn min_stake(&self) -> u128 {
        self.min_stake
    }

    /// Sum of stakes received since the last draw.
    #[must_use]
    pub const fn balance(&self) -> u128 {
        self.balance
    }

    /// Number of completed draws.
    #[must_use]
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Number of entries in the current round.
    #[must_use]
    pub fn entrant_count(&self) -> usize {
        self.entrants.len()
    }

    /// Most recent completed draw, if any.
    #[must_use]
    pub const fn last_draw(&self) -> Option<&DrawOutcome> {
        self.last_draw.as_ref()
    }
}
