//! Deployment configuration: collaborator addresses and engine overrides.
//!
//! ```toml
//! [deployment]
//! name = "arbitrum-main"
//! chain_id = 42161
//!
//! [deployment.contracts]
//! engine = "${LIQUIDATOR}"
//! owner = "0x..."
//! pool = "0x..."
//! data_provider = "0x..."
//! swap_router = "0x..."
//!
//! [engine]
//! profile = "conservative"
//! max_slippage_bps = 150
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Deployment metadata
    pub deployment: DeploymentDetails,
    /// Engine configuration overrides
    #[serde(default)]
    pub engine: Option<EngineConfigOverrides>,
}

/// Deployment details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDetails {
    /// Deployment name (e.g., "arbitrum-main")
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// Contract addresses (literal or `${ENV_VAR}`)
    pub contracts: DeploymentContracts,
}

/// Contract addresses for this deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentContracts {
    /// Address the liquidator runs as
    pub engine: String,
    /// Initial owner
    pub owner: String,
    /// Lending pool (flash loans + packed liquidation)
    pub pool: String,
    /// Pool data provider (debt registry)
    pub data_provider: String,
    /// Uniswap V3 swap router
    pub swap_router: String,
}

/// Engine configuration overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfigOverrides {
    /// Base profile the overrides apply to
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub max_slippage_bps: Option<u16>,
    #[serde(default)]
    pub swap_deadline_buffer_secs: Option<u64>,
    #[serde(default)]
    pub default_swap_fee: Option<u32>,
    /// Decimal or 0x-prefixed amount
    #[serde(default)]
    pub min_profit_threshold: Option<String>,
}

impl DeploymentConfig {
    /// Load deployment config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: DeploymentConfig = toml::from_str(content)?;
        Ok(config)
    }
}
