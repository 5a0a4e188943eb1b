//! Flash-loan liquidation engine.
//!
//! One liquidation runs as a single synchronous chain inside one execution
//! unit:
//!
//! ```text
//! initiate ─► LendingPool::flash_loan ─► on_loan_received
//!                                          ├─ execute  (packed liquidationCall)
//!                                          ├─ convert  (exactInputSingle, if assets differ)
//!                                          └─ settle   (approve principal + premium)
//! ```
//!
//! Any failure anywhere reverts the whole unit: balances, allowances and
//! buffered events return to their state before `initiate`.

mod admin;
mod callback;
mod converter;
mod executor;
mod orchestrator;
mod settler;


use std::sync::Arc;

use alloy::primitives::Address;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::collaborators::{Clock, DebtRegistry, EventSink, LendingPool, SwapRouter, TokenLedger};
use crate::config::{EngineConfig, ResolvedContracts, ResolvedDeployment};
use crate::error::{EngineError, Result};
use crate::events::EventLog;
use crate::guard::{OwnerGate, ReentrancyLatch};
use crate::unit::{ExecutionUnit, Journaled};

/// Furthest step reached by the most recent liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    LoanRequested,
    CallbackReceived,
    CollateralSeized,
    Converted,
    Settled,
    /// The unit failed and left no trace.
    Reverted,
}

/// External contracts the engine drives.
pub struct Collaborators {
    pub pool: Arc<dyn LendingPool>,
    pub registry: Arc<dyn DebtRegistry>,
    pub router: Arc<dyn SwapRouter>,
    pub ledger: Arc<dyn TokenLedger>,
    pub clock: Arc<dyn Clock>,
    journaled: Vec<Arc<dyn Journaled>>,
}

impl Collaborators {
    /// The ledger is also the first journaled participant of every unit.
    pub fn new<L>(
        pool: Arc<dyn LendingPool>,
        registry: Arc<dyn DebtRegistry>,
        router: Arc<dyn SwapRouter>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        L: TokenLedger + Journaled + 'static,
    {
        Self {
            pool,
            registry,
            router,
            ledger: ledger.clone(),
            clock,
            journaled: vec![ledger as Arc<dyn Journaled>],
        }
    }

    /// Roll back additional state together with the ledger.
    pub fn with_journaled(mut self, participant: Arc<dyn Journaled>) -> Self {
        self.journaled.push(participant);
        self
    }
}

/// The liquidation engine.
pub struct FlashLiquidator {
    /// Address the engine acts as towards every collaborator
    identity: Address,
    contracts: ResolvedContracts,
    owner: OwnerGate,
    config: RwLock<EngineConfig>,
    latch: ReentrancyLatch,
    phase: Mutex<Phase>,

    pool: Arc<dyn LendingPool>,
    registry: Arc<dyn DebtRegistry>,
    router: Arc<dyn SwapRouter>,
    ledger: Arc<dyn TokenLedger>,
    clock: Arc<dyn Clock>,

    events: Arc<EventLog>,
    unit: ExecutionUnit,
}

impl FlashLiquidator {
    /// Build an engine from resolved addresses.
    ///
    /// Fails with [`EngineError::InvalidConfig`] if the configuration is out
    /// of range or a collaborator does not live at its configured address.
    pub fn new(
        contracts: ResolvedContracts,
        config: EngineConfig,
        collaborators: Collaborators,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        config.validate()?;
        check_address("engine", contracts.engine)?;
        check_address("owner", contracts.owner)?;
        check_collaborator("pool", contracts.pool, collaborators.pool.address())?;
        check_collaborator(
            "data_provider",
            contracts.data_provider,
            collaborators.registry.address(),
        )?;
        check_collaborator(
            "swap_router",
            contracts.swap_router,
            collaborators.router.address(),
        )?;

        let events = Arc::new(EventLog::new(sink));
        let mut participants = collaborators.journaled;
        participants.push(events.clone());

        config.log_config();

        Ok(Self {
            identity: contracts.engine,
            contracts,
            owner: OwnerGate::new(contracts.owner),
            config: RwLock::new(config),
            latch: ReentrancyLatch::new(),
            phase: Mutex::new(Phase::Idle),
            pool: collaborators.pool,
            registry: collaborators.registry,
            router: collaborators.router,
            ledger: collaborators.ledger,
            clock: collaborators.clock,
            events,
            unit: ExecutionUnit::new(participants),
        })
    }

    pub fn from_deployment(
        deployment: &ResolvedDeployment,
        collaborators: Collaborators,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        Self::new(
            deployment.contracts,
            deployment.engine.clone(),
            collaborators,
            sink,
        )
    }

    pub fn identity(&self) -> Address {
        self.identity
    }

    pub fn contracts(&self) -> &ResolvedContracts {
        &self.contracts
    }

    pub fn owner(&self) -> Address {
        self.owner.owner()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> EngineConfig {
        self.config.read().clone()
    }

    pub fn last_phase(&self) -> Phase {
        *self.phase.lock()
    }

    fn set_phase(&self, phase: Phase) {
        debug!(phase = ?phase, "Liquidation phase");
        *self.phase.lock() = phase;
    }
}

fn check_address(field: &'static str, address: Address) -> Result<()> {
    if address.is_zero() {
        return Err(EngineError::InvalidAddress { field });
    }
    Ok(())
}

fn check_collaborator(name: &str, configured: Address, actual: Address) -> Result<()> {
    if configured != actual {
        return Err(EngineError::InvalidConfig(format!(
            "{name} configured at {configured} but collaborator lives at {actual}"
        )));
    }
    Ok(())
}
