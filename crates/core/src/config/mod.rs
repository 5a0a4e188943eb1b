//! Configuration for the liquidation engine.
//!
//! This module provides:
//! - Engine runtime configuration (profiles, slippage, deadline, fee tier)
//! - Deployment configuration (collaborator addresses, engine overrides)
//! - A loader that resolves `${ENV}` references and applies overrides

mod deployment;
mod engine;
mod loader;

// Re-export engine config (main runtime config)
pub use engine::{
    EngineConfig, MAX_DEADLINE_BUFFER_SECS, MAX_SLIPPAGE_BPS, MIN_DEADLINE_BUFFER_SECS,
};

// Re-export deployment config
pub use deployment::{
    DeploymentConfig, DeploymentContracts, DeploymentDetails, EngineConfigOverrides,
};

// Re-export deployment loader
pub use loader::{
    load_deployment, load_deployment_from_env, ResolvedContracts, ResolvedDeployment,
    DEFAULT_DEPLOYMENT_PATH,
};
