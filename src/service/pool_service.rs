//! Pool service: orchestrates contract calls against the ledger and emits
//! events.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::pool_entry::{PoolDetail, PoolSummary};
use crate::domain::{
    AccountId, ContractError, DrawOutcome, EntryReceipt, EventBus, InMemoryLedger, Ledger,
    LedgerStatus, PoolContract, PoolEvent, PoolId, PoolRegistry, RandomnessProvider,
};
use crate::error::GatewayError;

/// Orchestration layer for all pool operations.
///
/// Owns references to the [`PoolRegistry`] for contract state, the shared
/// [`InMemoryLedger`] for balances, and the [`EventBus`] for event emission.
/// Every mutation method follows the pattern: acquire pool lock → acquire
/// ledger → check the caller can pay → call the contract → charge fee and
/// seal a block → update metadata → emit event → return result.
///
/// Locks are always taken in the order registry, pool, then ledger.
#[derive(Debug, Clone)]
pub struct PoolService {
    registry: Arc<PoolRegistry>,
    ledger: Arc<Mutex<InMemoryLedger>>,
    randomness: Arc<dyn RandomnessProvider>,
    event_bus: EventBus,
    min_stake: u128,
}

impl PoolService {
    /// Creates a new `PoolService`. Pools it deploys require `min_stake` wei
    /// per entry.
    #[must_use]
    pub fn new(
        registry: Arc<PoolRegistry>,
        ledger: Arc<Mutex<InMemoryLedger>>,
        randomness: Arc<dyn RandomnessProvider>,
        event_bus: EventBus,
        min_stake: u128,
    ) -> Self {
        Self {
            registry,
            ledger,
            randomness,
            event_bus,
            min_stake,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`PoolRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// Minimum stake applied to newly created pools.
    #[must_use]
    pub const fn min_stake(&self) -> u128 {
        self.min_stake
    }

    /// Label of the configured randomness provider.
    #[must_use]
    pub fn randomness_mode(&self) -> String {
        self.randomness.describe()
    }

    /// Flat fee charged per committed call.
    pub async fn tx_fee(&self) -> u128 {
        self.ledger.lock().await.tx_fee()
    }

    /// Returns chain-level counters of the ledger.
    pub async fn ledger_status(&self) -> LedgerStatus {
        self.ledger.lock().await.status()
    }

    /// Opens a development account funded with `initial_balance` wei.
    pub async fn open_account(&self, initial_balance: u128) -> AccountId {
        let account = self.ledger.lock().await.open_account(initial_balance);
        tracing::info!(%account, initial_balance, "account opened");
        account
    }

    /// Returns the ledger balance of `account`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AccountNotFound`] if the account was never
    /// opened.
    pub async fn account_balance(&self, account: AccountId) -> Result<u128, GatewayError> {
        self.ledger
            .lock()
            .await
            .balance_of(account)
            .map_err(|_| GatewayError::AccountNotFound(*account.as_uuid()))
    }

    /// Deploys a new pool contract. `caller` becomes its operator.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the caller is unknown or cannot pay
    /// the call fee.
    pub async fn create_pool(
        &self,
        caller: AccountId,
        name: Option<String>,
    ) -> Result<PoolId, GatewayError> {
        // Registry before ledger: nothing can fail once the fee is charged.
        let slot = self.registry.reserve().await;
        let pool_id = slot.pool_id();
        let (contract_account, block) = {
            let mut ledger = self.ledger.lock().await;
            ledger.ensure_can_pay(caller, 0)?;
            let custody = ledger.open_contract_account();
            ledger.charge_fee(caller)?;
            (custody, ledger.seal_block(caller))
        };
        slot.fill(
            PoolContract::new(caller, contract_account, self.min_stake),
            name,
        );

        let _ = self.event_bus.publish(PoolEvent::PoolCreated {
            pool_id,
            operator: caller,
            contract_account,
            min_stake: self.min_stake.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %pool_id,
            operator = %caller,
            %contract_account,
            block_height = block.height,
            "pool created"
        );
        Ok(pool_id)
    }

    /// Enters `caller` into the pool with `value` wei.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the pool or caller is unknown, the
    /// caller cannot cover `value` plus the fee, or the contract rejects
    /// the stake.
    pub async fn enter(
        &self,
        pool_id: PoolId,
        caller: AccountId,
        value: u128,
    ) -> Result<EntryReceipt, GatewayError> {
        let entry_lock = self.registry.get(pool_id).await?;
        let mut entry = entry_lock.write().await;
        let mut ledger = self.ledger.lock().await;

        ledger.ensure_can_pay(caller, value)?;
        let receipt = entry
            .contract
            .enter(caller, value, &mut *ledger)
            .inspect_err(|err| log_rejection(pool_id, caller, "enter", err))?;
        ledger.charge_fee(caller)?;
        let block = ledger.seal_block(caller);
        drop(ledger);

        entry.total_entries = entry.total_entries.saturating_add(1);
        entry.last_modified_at = block.timestamp;
        drop(entry);

        let _ = self.event_bus.publish(PoolEvent::PlayerEntered {
            pool_id,
            player: caller,
            stake: receipt.stake.to_string(),
            entrant_count: receipt.entrant_count,
            pool_balance: receipt.pool_balance.to_string(),
            block_height: block.height,
            timestamp: block.timestamp,
        });

        tracing::info!(
            %pool_id,
            player = %caller,
            stake = receipt.stake,
            entrant_count = receipt.entrant_count,
            pool_balance = receipt.pool_balance,
            block_height = block.height,
            "player entered"
        );
        Ok(receipt)
    }

    /// Returns the entrants of the current round in entry order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolNotFound`] if the pool does not exist.
    pub async fn get_all_players(&self, pool_id: PoolId) -> Result<Vec<AccountId>, GatewayError> {
        let entry_lock = self.registry.get(pool_id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.contract.get_all_players().to_vec())
    }

    /// Draws a winner, pays out the pool and starts the next round.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the pool or caller is unknown, the
    /// caller is not the operator, the pool is empty, or the payout is
    /// refused by the ledger.
    pub async fn pick_winner(
        &self,
        pool_id: PoolId,
        caller: AccountId,
    ) -> Result<DrawOutcome, GatewayError> {
        let entry_lock = self.registry.get(pool_id).await?;
        let mut entry = entry_lock.write().await;
        let mut ledger = self.ledger.lock().await;

        ledger.ensure_can_pay(caller, 0)?;
        let outcome = entry
            .contract
            .pick_winner(caller, &mut *ledger, self.randomness.as_ref())
            .inspect_err(|err| log_rejection(pool_id, caller, "pick_winner", err))?;
        ledger.charge_fee(caller)?;
        let block = ledger.seal_block(caller);
        drop(ledger);

        entry.total_paid_out = entry.total_paid_out.saturating_add(outcome.prize);
        entry.last_modified_at = block.timestamp;
        drop(entry);

        let _ = self.event_bus.publish(PoolEvent::WinnerPicked {
            pool_id,
            round: outcome.round,
            winner: outcome.winner,
            prize: outcome.prize.to_string(),
            entrant_count: outcome.entrant_count,
            block_height: block.height,
            timestamp: block.timestamp,
        });

        tracing::info!(
            %pool_id,
            round = outcome.round,
            winner = %outcome.winner,
            winner_index = outcome.winner_index,
            prize = outcome.prize,
            entrant_count = outcome.entrant_count,
            block_height = block.height,
            "winner picked"
        );
        Ok(outcome)
    }

    /// Returns the full state of one pool.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolNotFound`] if the pool does not exist.
    pub async fn pool_detail(&self, pool_id: PoolId) -> Result<PoolDetail, GatewayError> {
        let entry_lock = self.registry.get(pool_id).await?;
        let entry = entry_lock.read().await;
        Ok(PoolDetail::from(&*entry))
    }

    /// Returns summaries of all pools, optionally filtered by operator.
    pub async fn list_pools(&self, operator_filter: Option<AccountId>) -> Vec<PoolSummary> {
        self.registry.list(operator_filter).await
    }
}

fn log_rejection(pool_id: PoolId, caller: AccountId, call: &str, err: &ContractError) {
    tracing::debug!(%pool_id, %caller, call, error = %err, "contract call rejected");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::units::{MIN_STAKE_WEI, WEI_PER_ETHER};
    use crate::domain::{FixedIndex, LedgerError};

    const FEE: u128 = 1_000_000_000_000_000;

    fn make_service(tx_fee: u128, randomness: Arc<dyn RandomnessProvider>) -> PoolService {
        let registry = Arc::new(PoolRegistry::new());
        let ledger = Arc::new(Mutex::new(InMemoryLedger::new(tx_fee)));
        let event_bus = EventBus::new(1000);
        PoolService::new(registry, ledger, randomness, event_bus, MIN_STAKE_WEI)
    }

    async fn funded(service: &PoolService) -> AccountId {
        service.open_account(10 * WEI_PER_ETHER).await
    }

    async fn balance(service: &PoolService, account: AccountId) -> u128 {
        let Ok(balance) = service.account_balance(account).await else {
            panic!("account should exist");
        };
        balance
    }

    async fn new_pool(service: &PoolService, operator: AccountId) -> PoolId {
        let Ok(pool_id) = service.create_pool(operator, None).await else {
            panic!("pool creation failed");
        };
        pool_id
    }

    #[tokio::test]
    async fn create_pool_emits_event() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let mut rx = service.event_bus().subscribe();
        let operator = funded(&service).await;

        let pool_id = new_pool(&service, operator).await;

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "pool_created");
        assert_eq!(event.pool_id(), pool_id);
    }

    #[tokio::test]
    async fn create_pool_requires_known_caller() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let result = service.create_pool(AccountId::new(), None).await;
        assert!(matches!(
            result,
            Err(GatewayError::Ledger(LedgerError::UnknownAccount(_)))
        ));
        assert!(service.registry().is_empty().await);
    }

    #[tokio::test]
    async fn unaffordable_deploy_leaves_no_trace() {
        let service = make_service(FEE, Arc::new(FixedIndex(0)));
        let broke = service.open_account(FEE - 1).await;
        let before = service.ledger_status().await;

        let result = service.create_pool(broke, None).await;
        assert!(matches!(
            result,
            Err(GatewayError::Ledger(LedgerError::InsufficientFunds { .. }))
        ));
        assert!(service.registry().is_empty().await);
        assert_eq!(balance(&service, broke).await, FEE - 1);
        assert_eq!(service.ledger_status().await, before);
    }

    #[tokio::test]
    async fn deploy_charges_fee_and_opens_custody() {
        let service = make_service(FEE, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;

        let status = service.ledger_status().await;
        assert_eq!(status.accounts, 2);
        assert_eq!(status.contract_accounts, 1);
        assert_eq!(status.total_fees_burned, FEE);
        assert_eq!(status.latest_block.height, 1);
        assert_eq!(balance(&service, operator).await, 10 * WEI_PER_ETHER - FEE);
        assert!(service.pool_detail(pool_id).await.is_ok());
    }

    #[tokio::test]
    async fn custody_accounts_cannot_submit_calls() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_a = new_pool(&service, operator).await;
        let pool_b = new_pool(&service, operator).await;
        let Ok(_) = service.enter(pool_a, player, WEI_PER_ETHER).await else {
            panic!("entry failed");
        };
        let Ok(detail_a) = service.pool_detail(pool_a).await else {
            panic!("pool lookup failed");
        };
        let custody_a = detail_a.contract_account;

        for target in [pool_a, pool_b] {
            let result = service.enter(target, custody_a, WEI_PER_ETHER / 2).await;
            assert!(matches!(
                result,
                Err(GatewayError::Ledger(LedgerError::ContractSubmitter(id))) if id == custody_a
            ));
        }
        assert!(matches!(
            service.create_pool(custody_a, None).await,
            Err(GatewayError::Ledger(LedgerError::ContractSubmitter(_)))
        ));
        assert_eq!(balance(&service, custody_a).await, WEI_PER_ETHER);

        let Ok(outcome) = service.pick_winner(pool_a, operator).await else {
            panic!("draw should succeed");
        };
        assert_eq!(outcome.winner, player);
        assert_eq!(outcome.prize, WEI_PER_ETHER);
        assert_eq!(balance(&service, custody_a).await, 0);
        assert_eq!(balance(&service, player).await, 10 * WEI_PER_ETHER);
    }

    #[tokio::test]
    async fn enter_moves_stake_and_records_player() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;

        let Ok(receipt) = service.enter(pool_id, player, WEI_PER_ETHER).await else {
            panic!("entry failed");
        };
        assert_eq!(receipt.entrant_count, 1);
        assert_eq!(receipt.pool_balance, WEI_PER_ETHER);
        assert_eq!(balance(&service, player).await, 9 * WEI_PER_ETHER);

        let Ok(players) = service.get_all_players(pool_id).await else {
            panic!("players lookup failed");
        };
        assert_eq!(players, vec![player]);
    }

    #[tokio::test]
    async fn players_are_listed_in_entry_order() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;

        let mut expected = Vec::new();
        for _ in 0..3 {
            let player = funded(&service).await;
            let Ok(_) = service.enter(pool_id, player, MIN_STAKE_WEI * 2).await else {
                panic!("entry failed");
            };
            expected.push(player);
        }

        let Ok(players) = service.get_all_players(pool_id).await else {
            panic!("players lookup failed");
        };
        assert_eq!(players, expected);
    }

    #[tokio::test]
    async fn low_stake_is_rejected_without_charging() {
        let service = make_service(FEE, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;
        let mut rx = service.event_bus().subscribe();

        let result = service.enter(pool_id, player, 100).await;
        assert!(matches!(
            result,
            Err(GatewayError::Contract(ContractError::InsufficientStake { .. }))
        ));
        assert_eq!(balance(&service, player).await, 10 * WEI_PER_ETHER);
        assert!(rx.try_recv().is_err());

        let Ok(detail) = service.pool_detail(pool_id).await else {
            panic!("pool lookup failed");
        };
        assert!(detail.players.is_empty());
        assert_eq!(detail.balance, 0);
    }

    #[tokio::test]
    async fn stake_plus_fee_must_be_affordable() {
        let service = make_service(FEE, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = service.open_account(WEI_PER_ETHER).await;
        let pool_id = new_pool(&service, operator).await;

        let result = service.enter(pool_id, player, WEI_PER_ETHER).await;
        assert!(matches!(
            result,
            Err(GatewayError::Ledger(LedgerError::InsufficientFunds { .. }))
        ));
        assert_eq!(balance(&service, player).await, WEI_PER_ETHER);
    }

    #[tokio::test]
    async fn non_operator_cannot_pick_winner() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;
        let Ok(_) = service.enter(pool_id, player, WEI_PER_ETHER).await else {
            panic!("entry failed");
        };

        let result = service.pick_winner(pool_id, player).await;
        assert!(matches!(
            result,
            Err(GatewayError::Contract(ContractError::Unauthorized { .. }))
        ));

        let Ok(players) = service.get_all_players(pool_id).await else {
            panic!("players lookup failed");
        };
        assert_eq!(players.len(), 1);
    }

    #[tokio::test]
    async fn empty_pool_draw_is_rejected() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;

        let result = service.pick_winner(pool_id, operator).await;
        assert!(matches!(
            result,
            Err(GatewayError::Contract(ContractError::NoEntrants))
        ));
    }

    #[tokio::test]
    async fn draw_pays_winner_and_resets_round() {
        let service = make_service(FEE, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;
        let Ok(_) = service.enter(pool_id, player, 2 * WEI_PER_ETHER).await else {
            panic!("entry failed");
        };
        let before = balance(&service, player).await;
        let mut rx = service.event_bus().subscribe();

        let Ok(outcome) = service.pick_winner(pool_id, operator).await else {
            panic!("draw failed");
        };
        assert_eq!(outcome.winner, player);
        assert_eq!(outcome.prize, 2 * WEI_PER_ETHER);
        assert_eq!(outcome.round, 1);

        let gained = balance(&service, player).await - before;
        assert!(gained > WEI_PER_ETHER * 18 / 10);

        let Ok(detail) = service.pool_detail(pool_id).await else {
            panic!("pool lookup failed");
        };
        assert!(detail.players.is_empty());
        assert_eq!(detail.balance, 0);
        assert_eq!(detail.round, 1);
        assert_eq!(detail.total_paid_out, 2 * WEI_PER_ETHER);
        assert_eq!(detail.last_draw, Some(outcome));
        assert_eq!(balance(&service, detail.contract_account).await, 0);

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "winner_picked");
    }

    #[tokio::test]
    async fn refused_payout_keeps_the_round() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let player = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;
        let Ok(_) = service.enter(pool_id, player, WEI_PER_ETHER).await else {
            panic!("entry failed");
        };
        let Ok(()) = service
            .ledger
            .lock()
            .await
            .set_rejects_payments(player, true)
        else {
            panic!("account should exist");
        };

        let result = service.pick_winner(pool_id, operator).await;
        assert!(matches!(
            result,
            Err(GatewayError::Contract(ContractError::PayoutTransfer(_)))
        ));

        let Ok(detail) = service.pool_detail(pool_id).await else {
            panic!("pool lookup failed");
        };
        assert_eq!(detail.players, vec![player]);
        assert_eq!(detail.balance, WEI_PER_ETHER);
        assert_eq!(detail.round, 0);
    }

    #[tokio::test]
    async fn list_pools_filters_by_operator() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let alice = funded(&service).await;
        let bob = funded(&service).await;
        let _ = new_pool(&service, alice).await;
        let _ = new_pool(&service, alice).await;
        let _ = new_pool(&service, bob).await;

        assert_eq!(service.list_pools(None).await.len(), 3);
        assert_eq!(service.list_pools(Some(alice)).await.len(), 2);
        assert_eq!(service.list_pools(Some(bob)).await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_pool_is_not_found() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let caller = funded(&service).await;
        let result = service.enter(PoolId::new(), caller, WEI_PER_ETHER).await;
        assert!(matches!(result, Err(GatewayError::PoolNotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_entries_are_all_recorded() {
        let service = make_service(0, Arc::new(FixedIndex(0)));
        let operator = funded(&service).await;
        let pool_id = new_pool(&service, operator).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let svc = service.clone();
            handles.push(tokio::spawn(async move {
                let player = svc.open_account(WEI_PER_ETHER).await;
                svc.enter(pool_id, player, MIN_STAKE_WEI).await.is_ok()
            }));
        }
        for handle in handles {
            let Ok(ok) = handle.await else {
                panic!("task panicked");
            };
            assert!(ok);
        }

        let Ok(detail) = service.pool_detail(pool_id).await else {
            panic!("pool lookup failed");
        };
        assert_eq!(detail.players.len(), 16);
        assert_eq!(detail.balance, 16 * MIN_STAKE_WEI);
        assert_eq!(balance(&service, detail.contract_account).await, detail.balance);
    }
}
