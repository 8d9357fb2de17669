//! Domain layer: the lottery contract, its host ledger, and the event system.
//!
//! This module contains the contract state machine, the ledger it runs
//! against, winner-selection providers, pool and account identity, pool
//! entries with metadata, the event bus for broadcasting state changes, and
//! the pool registry for concurrent pool storage.

pub mod account_id;
pub mod contract;
pub mod event_bus;
pub mod ledger;
pub mod pool_entry;
pub mod pool_event;
pub mod pool_id;
pub mod pool_registry;
pub mod randomness;
pub mod units;
mod uuid_id;

pub use account_id::AccountId;
pub use contract::{ContractError, DrawOutcome, EntryReceipt, PoolContract};
pub use event_bus::EventBus;
pub use ledger::{BlockInfo, InMemoryLedger, Ledger, LedgerError, LedgerStatus};
pub use pool_entry::{PoolDetail, PoolEntry, PoolSummary};
pub use pool_event::PoolEvent;
pub use pool_id::PoolId;
pub use pool_registry::{PoolRegistry, PoolSlot};
pub use randomness::{BlockHashRandomness, FixedIndex, RandomnessProvider, SeededRandomness};
