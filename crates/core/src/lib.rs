//! Flash-loan liquidation engine.
//!
//! This crate provides:
//! - The liquidation chain: flash loan, packed liquidation, collateral
//!   conversion and repayment, run as one all-or-nothing execution unit
//! - Owner-only tuning and emergency operations behind a reentrancy latch
//! - Engine and deployment configuration with named profiles
//! - Collaborator traits and in-memory implementations for dry runs

pub mod collaborators;
pub mod config;
pub mod engine;
mod error;
pub mod events;
mod guard;
pub mod sim;
pub mod u256_math;
pub mod unit;

pub use collaborators::{
    Clock, DebtRegistry, EventSink, FlashLoanReceiver, LendingPool, ReserveDebt, ReserveTokens,
    SwapRouter, SystemClock, TokenLedger,
};
pub use config::{
    load_deployment, load_deployment_from_env, DeploymentConfig, EngineConfig, ResolvedContracts,
    ResolvedDeployment,
};
pub use engine::{Collaborators, FlashLiquidator, Phase};
pub use error::{EngineError, Result};
pub use events::{EngineEvent, EventLog, TracingSink};
pub use guard::{LatchGuard, OwnerGate, ReentrancyLatch};
pub use unit::{ExecutionUnit, Journaled};

// Wire types callers build requests with.
pub use flashliq_chain::{FeeTier, LiquidationParams};
