//! Deployment loader that resolves addresses and engine settings.
//!
//! Single entry point for everything a [`FlashLiquidator`](crate::FlashLiquidator)
//! needs from configuration. No collaborator address is hardcoded; all of
//! them come from the deployment file or the environment.

use super::{DeploymentConfig, EngineConfig, EngineConfigOverrides};
use alloy::primitives::{Address, U256};
use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Default deployment file when `DEPLOYMENT_CONFIG` is unset.
pub const DEFAULT_DEPLOYMENT_PATH: &str = "./config/deployment.toml";

/// Fully resolved deployment configuration.
#[derive(Debug, Clone)]
pub struct ResolvedDeployment {
    /// Deployment name
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// Contract addresses
    pub contracts: ResolvedContracts,
    /// Engine configuration (with deployment overrides applied)
    pub engine: EngineConfig,
}

/// Resolved contract addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedContracts {
    /// Identity the engine acts as
    pub engine: Address,
    /// Initial owner
    pub owner: Address,
    /// Lending pool address
    pub pool: Address,
    /// Pool data provider address
    pub data_provider: Address,
    /// Swap router address
    pub swap_router: Address,
}

impl ResolvedDeployment {
    /// Resolve a parsed deployment file.
    pub fn resolve(config: &DeploymentConfig) -> Result<Self> {
        let contracts = &config.deployment.contracts;

        let contracts = ResolvedContracts {
            engine: parse_addr("engine", &contracts.engine)?,
            owner: parse_addr("owner", &contracts.owner)?,
            pool: parse_addr("pool", &contracts.pool)?,
            data_provider: parse_addr("data_provider", &contracts.data_provider)?,
            swap_router: parse_addr("swap_router", &contracts.swap_router)?,
        };

        let engine = build_engine_config(config.engine.as_ref())?;

        Ok(Self {
            name: config.deployment.name.clone(),
            chain_id: config.deployment.chain_id,
            contracts,
            engine,
        })
    }
}

/// Expand a `${VAR}` reference, leaving literals untouched.
fn expand_env(s: &str) -> Result<String> {
    match s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => {
            std::env::var(var_name).with_context(|| format!("Missing env var: {var_name}"))
        }
        None => Ok(s.to_string()),
    }
}

fn parse_addr(field: &str, raw: &str) -> Result<Address> {
    let value = expand_env(raw).with_context(|| format!("Resolving {field}"))?;
    let address: Address = value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {field} address '{value}': {e}"))?;
    if address.is_zero() {
        anyhow::bail!("{field} address must not be zero");
    }
    Ok(address)
}

fn build_engine_config(overrides: Option<&EngineConfigOverrides>) -> Result<EngineConfig> {
    // Start with base config from profile or environment
    let mut config = match overrides.and_then(|o| o.profile.as_deref()) {
        Some(profile) => EngineConfig::load_profile(profile)
            .ok_or_else(|| anyhow::anyhow!("Unknown engine profile '{profile}'"))?,
        None => EngineConfig::from_env(),
    };

    // Apply overrides
    if let Some(ovr) = overrides {
        if let Some(v) = ovr.max_slippage_bps {
            config.set_max_slippage(v)?;
        }
        if let Some(v) = ovr.swap_deadline_buffer_secs {
            config.set_swap_deadline_buffer(v)?;
        }
        if let Some(v) = ovr.default_swap_fee {
            config.set_default_swap_fee(v)?;
        }
        if let Some(v) = &ovr.min_profit_threshold {
            let amount = U256::from_str(v.trim())
                .map_err(|e| anyhow::anyhow!("Invalid min_profit_threshold '{v}': {e}"))?;
            config.set_min_profit_threshold(amount);
        }
    }

    Ok(config)
}

/// Load and resolve a deployment file.
pub fn load_deployment(path: impl AsRef<Path>) -> Result<ResolvedDeployment> {
    let path = path.as_ref();
    info!(path = %path.display(), "Loading deployment configuration");

    let config = DeploymentConfig::from_file(path)
        .with_context(|| format!("Failed to load deployment from {:?}", path))?;
    let resolved = ResolvedDeployment::resolve(&config)?;

    info!(
        deployment = %resolved.name,
        chain_id = resolved.chain_id,
        engine = %resolved.contracts.engine,
        pool = %resolved.contracts.pool,
        router = %resolved.contracts.swap_router,
        "Deployment resolved"
    );
    Ok(resolved)
}

/// Load deployment from the DEPLOYMENT_CONFIG env var, reading `.env` first.
pub fn load_deployment_from_env() -> Result<ResolvedDeployment> {
    dotenvy::dotenv().ok();
    let path =
        std::env::var("DEPLOYMENT_CONFIG").unwrap_or_else(|_| DEFAULT_DEPLOYMENT_PATH.to_string());
    load_deployment(path)
}
